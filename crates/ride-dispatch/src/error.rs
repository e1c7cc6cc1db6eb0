//! # Dispatch Error Types
//!
//! Errors surfaced by `ride-dispatch`, and the serializable shape handed to
//! whatever wraps the engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DispatchEngine ── CoreError ─────┐                                    │
//! │                                   ▼                                    │
//! │  DispatchConfig ── io/toml ──► DispatchError ──► ErrorResponse         │
//! │                                                  { code, message }      │
//! │                                                                         │
//! │  The caller switches on `code`; `message` is for people.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use ride_core::CoreError;

/// Result type alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Everything that can go wrong outside the pure domain.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Domain error from the engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration values are inconsistent.
    #[error("Invalid dispatch configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl From<std::io::Error> for DispatchError {
    fn from(err: std::io::Error) -> Self {
        DispatchError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for DispatchError {
    fn from(err: toml::de::Error) -> Self {
        DispatchError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for DispatchError {
    fn from(err: toml::ser::Error) -> Self {
        DispatchError::ConfigSaveFailed(err.to_string())
    }
}

impl DispatchError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Core(err) => ErrorCode::from(err),
            _ => ErrorCode::ConfigError,
        }
    }
}

// =============================================================================
// Error Response
// =============================================================================

/// Machine-readable failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    DuplicateIdentifier,
    NotFound,
    InvalidStateTransition,
    RideNotAvailable,
    InvalidFare,
    ConfigError,
}

impl From<&CoreError> for ErrorCode {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::DuplicateIdentifier { .. } => ErrorCode::DuplicateIdentifier,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            CoreError::RideNotAvailable { .. } => ErrorCode::RideNotAvailable,
            CoreError::InvalidFare { .. } => ErrorCode::InvalidFare,
        }
    }
}

/// What a caller receives when an operation fails.
///
/// ```json
/// {
///   "code": "RIDE_NOT_AVAILABLE",
///   "message": "Ride 1 not available: driver is not available"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&DispatchError> for ErrorResponse {
    fn from(err: &DispatchError) -> Self {
        ErrorResponse {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        ErrorResponse {
            code: ErrorCode::from(err),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ride_core::{EntityKind, TripId, UnavailableReason};

    #[test]
    fn test_core_error_codes() {
        let err = CoreError::InvalidFare { fare: -1.0 };
        assert_eq!(ErrorCode::from(&err), ErrorCode::InvalidFare);

        let err = CoreError::not_found(EntityKind::Driver, "D9");
        assert_eq!(ErrorCode::from(&err), ErrorCode::NotFound);
    }

    #[test]
    fn test_error_response_json() {
        let err: DispatchError = CoreError::RideNotAvailable {
            trip_id: TripId::new(1),
            reason: UnavailableReason::DriverUnavailable,
        }
        .into();

        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["code"], "RIDE_NOT_AVAILABLE");
        assert_eq!(
            json["message"],
            "Ride 1 not available: driver is not available"
        );
    }

    #[test]
    fn test_config_errors() {
        let err = DispatchError::InvalidConfig("empty filter".into());
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn test_core_error_code_passes_through() {
        let err: DispatchError = CoreError::InvalidFare { fare: 0.0 }.into();
        assert_eq!(err.code(), ErrorCode::InvalidFare);
    }
}
