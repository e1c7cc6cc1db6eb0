//! # Dispatch Configuration
//!
//! Settings for the process that hosts a `DispatchEngine`.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RIDE_SINGLE_TRIP_PER_DRIVER=true                                   │
//! │     RIDE_LOG_FILTER=debug                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dispatch/dispatch.toml (Linux)                           │
//! │     ~/Library/Application Support/com.ridecore.dispatch/ (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [engine]
//! single_trip_per_driver = false
//!
//! [logging]
//! filter = "info,ride_dispatch=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{DispatchError, DispatchResult};

// =============================================================================
// Engine Settings
// =============================================================================

/// Matching policy knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// When true, accepting a trip marks the driver unavailable, and closing
    /// their last in-progress trip marks them available again. A manual
    /// toggle in between wins.
    ///
    /// Off by default: availability is then purely the driver's toggle and a
    /// driver may hold several in-progress trips.
    #[serde(default)]
    pub single_trip_per_driver: bool,
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log output settings. `RUST_LOG` still wins over `filter` at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,ride_dispatch=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Dispatch Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl DispatchConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (dispatch.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DispatchResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading dispatch config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load dispatch config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> DispatchResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DispatchError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DispatchError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| DispatchError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Dispatch config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DispatchResult<()> {
        if self.logging.filter.trim().is_empty() {
            return Err(DispatchError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("RIDE_SINGLE_TRIP_PER_DRIVER") {
            match parse_bool(&value) {
                Some(flag) => {
                    debug!(
                        single_trip_per_driver = flag,
                        "Overriding engine policy from environment"
                    );
                    self.engine.single_trip_per_driver = flag;
                }
                None => warn!(
                    value = %value,
                    "Ignoring unrecognized RIDE_SINGLE_TRIP_PER_DRIVER"
                ),
            }
        }

        if let Ok(filter) = std::env::var("RIDE_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "ridecore", "dispatch")
            .map(|dirs| dirs.config_dir().join("dispatch.toml"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    const ENV_VARS: [&str; 2] = ["RIDE_SINGLE_TRIP_PER_DRIVER", "RIDE_LOG_FILTER"];

    /// Serializes tests that call `load`, since it reads process-wide env.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets env vars for one test and restores the previous values on drop.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let saved = ENV_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect();
            for name in ENV_VARS {
                std::env::remove_var(name);
            }
            for (name, value) in vars {
                std::env::set_var(name, value);
            }
            EnvGuard { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert!(!config.engine.single_trip_per_driver);
        assert_eq!(config.logging.filter, "info,ride_dispatch=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = DispatchConfig::default();
        config.logging.filter = "   ".to_string();
        assert!(matches!(
            config.validate(),
            Err(DispatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DispatchConfig =
            toml::from_str("[engine]\nsingle_trip_per_driver = true\n").unwrap();
        assert!(config.engine.single_trip_per_driver);
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dispatch.toml");

        let mut config = DispatchConfig::default();
        config.logging.filter = "warn".to_string();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[engine]"));
        assert!(contents.contains("[logging]"));

        let loaded: DispatchConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.logging.filter, "warn");
    }

    #[test]
    fn test_load_reads_saved_file() {
        let _lock = env_lock();
        let _env = EnvGuard::set(&[]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.toml");

        let mut config = DispatchConfig::default();
        config.engine.single_trip_per_driver = true;
        config.logging.filter = "warn,ride_dispatch=info".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = DispatchConfig::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let _lock = env_lock();
        let _env = EnvGuard::set(&[]);
        let dir = tempfile::tempdir().unwrap();

        let loaded = DispatchConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, DispatchConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let _lock = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.toml");
        DispatchConfig::default().save(Some(path.clone())).unwrap();

        {
            let _env = EnvGuard::set(&[
                ("RIDE_SINGLE_TRIP_PER_DRIVER", "yes"),
                ("RIDE_LOG_FILTER", "trace"),
            ]);
            let loaded = DispatchConfig::load(Some(path.clone())).unwrap();
            assert!(loaded.engine.single_trip_per_driver);
            assert_eq!(loaded.logging.filter, "trace");
        }

        {
            let _env = EnvGuard::set(&[("RIDE_SINGLE_TRIP_PER_DRIVER", "sometimes")]);
            let loaded = DispatchConfig::load(Some(path.clone())).unwrap();
            assert!(!loaded.engine.single_trip_per_driver);
            assert_eq!(loaded.logging, LoggingSettings::default());
        }

        {
            let _env = EnvGuard::set(&[("RIDE_LOG_FILTER", " ")]);
            let err = DispatchConfig::load(Some(path)).unwrap_err();
            assert!(matches!(err, DispatchError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let _lock = env_lock();
        let _env = EnvGuard::set(&[]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.toml");
        std::fs::write(&path, "[engine\nsingle_trip_per_driver = ").unwrap();

        let err = DispatchConfig::load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, DispatchError::ConfigLoadFailed(_)));

        assert_eq!(
            DispatchConfig::load_or_default(Some(path)).engine,
            EngineSettings::default()
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
