//! # Error Types
//!
//! Domain-specific error types for ride-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ride-core errors (this file)                                          │
//! │  ├── CoreError        - Registry, lifecycle and matching failures      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ride-dispatch errors (separate crate)                                 │
//! │  └── DispatchError    - Core errors plus configuration failures        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DispatchError → ErrorResponse     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable. A failed operation leaves the engine exactly
//! as it was, so the caller can re-prompt or abort.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trip::{TripId, TripStatus};

// =============================================================================
// Entity Kind
// =============================================================================

/// Which identifier namespace an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Rider,
    Driver,
    Trip,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Rider => write!(f, "Rider"),
            EntityKind::Driver => write!(f, "Driver"),
            EntityKind::Trip => write!(f, "Trip"),
        }
    }
}

// =============================================================================
// Unavailable Reason
// =============================================================================

/// Why a ride could not be matched or closed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The driver's availability flag is off.
    DriverUnavailable,
    /// The trip is not in the pending collection.
    TripNotPending,
    /// The trip was requested by a different rider.
    RiderMismatch,
    /// The trip was accepted by a different driver.
    DriverMismatch,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::DriverUnavailable => write!(f, "driver is not available"),
            UnavailableReason::TripNotPending => write!(f, "trip is not pending"),
            UnavailableReason::RiderMismatch => write!(f, "trip belongs to another rider"),
            UnavailableReason::DriverMismatch => write!(f, "trip is assigned to another driver"),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core dispatch errors.
///
/// These errors represent rule violations in the registry, the trip
/// lifecycle or the matching flow.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An identifier is already registered within its namespace.
    ///
    /// ## When This Occurs
    /// - Registering rider "R1" twice
    /// - Registering driver "D1" twice
    ///
    /// A rider and a driver may share an identifier: the namespaces are
    /// independent.
    #[error("{kind} '{id}' is already registered")]
    DuplicateIdentifier { kind: EntityKind, id: String },

    /// Unknown rider, driver or trip identifier.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A lifecycle operation was called out of order.
    ///
    /// ## When This Occurs
    /// ```text
    /// Pending ──start──► InProgress ──end──► Completed
    ///    │                   │
    ///    └──────cancel───────┴──────────────► Cancelled
    ///
    /// end() on Pending      → InvalidStateTransition
    /// start() on Completed  → InvalidStateTransition
    /// end() twice           → InvalidStateTransition
    /// ```
    #[error("Trip {trip_id} is {from}, cannot {action}")]
    InvalidStateTransition {
        trip_id: TripId,
        from: TripStatus,
        action: &'static str,
    },

    /// The ride cannot be matched (or closed) right now.
    #[error("Ride {trip_id} not available: {reason}")]
    RideNotAvailable {
        trip_id: TripId,
        reason: UnavailableReason,
    },

    /// Fare is zero, negative or not a finite number.
    #[error("Invalid fare: {fare}")]
    InvalidFare { fare: f64 },
}

impl CoreError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns true if the failure was caused by the caller's input rather
    /// than by the current state of the engine.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_) | CoreError::InvalidFare { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::RideNotAvailable {
            trip_id: TripId::new(3),
            reason: UnavailableReason::DriverUnavailable,
        };
        assert_eq!(err.to_string(), "Ride 3 not available: driver is not available");

        let err = CoreError::not_found(EntityKind::Rider, "R9");
        assert_eq!(err.to_string(), "Rider not found: R9");

        let err = CoreError::InvalidStateTransition {
            trip_id: TripId::new(1),
            from: TripStatus::Completed,
            action: "end",
        };
        assert_eq!(err.to_string(), "Trip 1 is Completed, cannot end");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "destination".to_string(),
        };
        assert_eq!(err.to_string(), "destination is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(core_err.is_input_error());
    }

    #[test]
    fn test_state_errors_are_not_input_errors() {
        let err = CoreError::DuplicateIdentifier {
            kind: EntityKind::Driver,
            id: "D1".to_string(),
        };
        assert!(!err.is_input_error());
        assert_eq!(err.to_string(), "Driver 'D1' is already registered");
    }
}
