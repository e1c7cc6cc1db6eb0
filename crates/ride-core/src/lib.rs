//! # ride-core: Pure Domain Logic for Ride Dispatch
//!
//! The domain vocabulary of the dispatch system: riders, drivers, trips and
//! the fare formula. Nothing in here touches locks, files or the network;
//! `ride-dispatch` wraps these types in shared state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ride Dispatch Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Caller (menus, prompts, input parsing)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ validated ids, strings, fares          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ride-dispatch (DispatchEngine)                  │   │
//! │  │      registry • pending/completed trips • histories • lock      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ride-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   trip    │  │   fare    │  │ validation│  │   │
//! │  │   │  Rider    │  │   Trip    │  │   Fare    │  │   phone   │  │   │
//! │  │   │  Driver   │  │ TripStatus│  │  formula  │  │  required │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identity types (Rider, Driver, Profile)
//! - [`trip`] - Trip record and its lifecycle
//! - [`fare`] - Fare amount and the suggested-fare formula
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use ride_core::trip::{Trip, TripId, TripStatus};
//! use ride_core::fare::Fare;
//!
//! let mut trip = Trip::new(TripId::new(1), "R1", "Alice", "Home", "Work").unwrap();
//! assert_eq!(trip.status(), TripStatus::Pending);
//!
//! trip.start("D1").unwrap();
//! trip.set_fare(Fare::new(15.0));
//! trip.end().unwrap();
//! assert_eq!(trip.status(), TripStatus::Completed);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fare;
pub mod trip;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, EntityKind, UnavailableReason, ValidationError};
pub use fare::{calculate_fare, Fare};
pub use trip::{Trip, TripId, TripStatus};
pub use types::{Driver, Identity, Profile, Rider};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Accepted phone number lengths, in ASCII digits.
pub const PHONE_DIGIT_COUNTS: [usize; 2] = [10, 11];

/// Multiplier applied to the location-length difference by the fare formula.
pub const FARE_PER_CHARACTER: f64 = 10.0;
