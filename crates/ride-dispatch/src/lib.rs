//! # ride-dispatch: Matching Engine for Ride Dispatch
//!
//! Owns the live state of a dispatch system: who is registered, which trips
//! are waiting, which are done, and who rode or drove what.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Dispatch Engine Architecture                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │            DispatchEngine (cloneable, Send + Sync)               │  │
//! │  │                                                                  │  │
//! │  │  One Arc<RwLock<DispatchState>> guards every collection.        │  │
//! │  │  Mutations hold the write lock across check-then-apply.         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   Registry     │  │  Trip arena    │  │   History tracker      │    │
//! │  │                │  │                │  │                        │    │
//! │  │ riders         │  │ every trip     │  │ rider log: completed   │    │
//! │  │ drivers        │  │ pending ids    │  │ driver log: accepted   │    │
//! │  │ (separate ids) │  │ completed ids  │  │                        │    │
//! │  │                │  │ cancelled ids  │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  DispatchConfig: policy + log filter (TOML file, env overrides) │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`engine`] - `DispatchEngine` and its snapshot
//! - `registry` - Identity registry, one per namespace (internal)
//! - [`history`] - Resolved rider and driver histories
//! - [`config`] - Configuration loading
//! - [`error`] - Error types and caller-facing responses
//!
//! ## Example
//! ```rust
//! use ride_core::Fare;
//! use ride_dispatch::{DispatchEngine, ErrorCode, ErrorResponse};
//!
//! let engine = DispatchEngine::new();
//! engine.register_rider("R1", "Alice", "5551234567").unwrap();
//! engine.register_driver("D1", "Bob", "15551234567", "Car").unwrap();
//! let trip = engine.request_ride("R1", "Home", "Work").unwrap();
//!
//! let err = engine
//!     .accept_trip("D1", trip.id(), "R1", Fare::new(0.0))
//!     .unwrap_err();
//! assert_eq!(ErrorResponse::from(&err).code, ErrorCode::InvalidFare);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
mod registry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{DispatchConfig, EngineSettings, LoggingSettings};
pub use engine::{DispatchEngine, DispatchSnapshot};
pub use error::{DispatchError, DispatchResult, ErrorCode, ErrorResponse};
pub use history::TripHistory;
