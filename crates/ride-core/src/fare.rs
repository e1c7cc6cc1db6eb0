//! # Fare Module
//!
//! The `Fare` amount attached to a trip and the suggested-fare formula.
//!
//! ## Two Fare Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Suggested fare (display only)        Agreed fare (stored on trip)      │
//! │  ─────────────────────────────        ────────────────────────────      │
//! │  calculate_fare(start, dest)          driver types an amount            │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  |len(start) - len(dest)| * 10        accept_trip(.., fare) checks > 0  │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                       trip.set_fare(fare)               │
//! │                                                                         │
//! │  The two never feed each other.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fares are plain floating point amounts. Unlike a ledger there is no
//! arithmetic on them: they are stored, compared against zero and shown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FARE_PER_CHARACTER;

// =============================================================================
// Fare Type
// =============================================================================

/// A trip fare in the caller's currency unit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fare(f64);

impl Fare {
    /// Wraps an amount. No checks: positivity is enforced where a fare is
    /// agreed, not where it is stored.
    #[inline]
    pub const fn new(amount: f64) -> Self {
        Fare(amount)
    }

    /// Zero fare, the value of every trip before acceptance.
    #[inline]
    pub const fn zero() -> Self {
        Fare(0.0)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> f64 {
        self.0
    }

    /// Checks that the fare is a finite number greater than zero.
    #[inline]
    pub fn is_payable(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl From<f64> for Fare {
    fn from(amount: f64) -> Self {
        Fare(amount)
    }
}

/// Formats the bare amount, the way trip details print it.
///
/// ```rust
/// use ride_core::fare::Fare;
///
/// assert_eq!(Fare::new(15.0).to_string(), "15");
/// assert_eq!(Fare::new(12.5).to_string(), "12.5");
/// ```
impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Suggested Fare
// =============================================================================

/// Placeholder distance model: the absolute difference between the
/// character counts of the two locations, times 10.
///
/// ## Example
/// ```rust
/// use ride_core::fare::calculate_fare;
///
/// assert_eq!(calculate_fare("A", "ABC").amount(), 20.0);
/// assert_eq!(calculate_fare("NYC", "NYC").amount(), 0.0);
/// ```
pub fn calculate_fare(start: &str, destination: &str) -> Fare {
    let diff = start.chars().count().abs_diff(destination.chars().count());
    Fare(diff as f64 * FARE_PER_CHARACTER)
}

// =============================================================================
// Unit Tests
// =============================================================================
