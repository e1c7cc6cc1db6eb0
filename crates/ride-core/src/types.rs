//! # Identity Types
//!
//! Riders and drivers.
//!
//! ## Type Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │     Rider       │        │     Driver      │                        │
//! │  │  ─────────────  │        │  ─────────────  │                        │
//! │  │  profile        │        │  profile        │                        │
//! │  │  history        │        │  vehicle        │                        │
//! │  └────────┬────────┘        │  available      │                        │
//! │           │                 │  history        │                        │
//! │           │                 └────────┬────────┘                        │
//! │           └───────────┬──────────────┘                                 │
//! │                       ▼                                                 │
//! │              ┌─────────────────┐                                        │
//! │              │    Profile      │   Both implement `Identity`,           │
//! │              │  id, name,      │   which the registry is generic        │
//! │              │  phone          │   over.                                │
//! │              └─────────────────┘                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Histories hold `TripId`s, not trips. The dispatch engine owns every trip
//! and resolves the ids on read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, EntityKind};
use crate::trip::TripId;
use crate::validation::{validate_phone, validate_required};

// =============================================================================
// Identity Trait
// =============================================================================

/// Shared surface of everything the registry stores.
pub trait Identity {
    /// Namespace the identifier lives in.
    const KIND: EntityKind;

    fn profile(&self) -> &Profile;

    /// Trips recorded against this identity, oldest first.
    fn history(&self) -> &[TripId];

    /// Appends a trip to the history. Entries are never removed.
    fn record_trip(&mut self, trip_id: TripId);

    fn id(&self) -> &str {
        &self.profile().id
    }

    fn name(&self) -> &str {
        &self.profile().name
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Identifier, display name and phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// 10 or 11 ASCII digits.
    pub phone: String,
}

impl Profile {
    /// Validates and builds a profile.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();
        let phone = phone.into();

        validate_required("id", &id)?;
        validate_required("name", &name)?;
        validate_phone(&phone)?;

        Ok(Profile { id, name, phone })
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User ID: {}, Name: {}, Phone: {}",
            self.id, self.name, self.phone
        )
    }
}

// =============================================================================
// Rider
// =============================================================================

/// Someone who requests rides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub profile: Profile,
    /// Completed trips, in completion order.
    history: Vec<TripId>,
}

impl Rider {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> CoreResult<Self> {
        Ok(Rider {
            profile: Profile::new(id, name, phone)?,
            history: Vec::new(),
        })
    }
}

impl Identity for Rider {
    const KIND: EntityKind = EntityKind::Rider;

    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn history(&self) -> &[TripId] {
        &self.history
    }

    fn record_trip(&mut self, trip_id: TripId) {
        self.history.push(trip_id);
    }
}

impl fmt::Display for Rider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile)
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Someone who accepts rides.
///
/// ## Availability
/// A manual toggle owned by the driver. New drivers start available.
/// Whether accepting a trip clears it is the engine's policy, not the
/// driver's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub profile: Profile,
    /// Free-form vehicle description ("Blue Corolla, ABC-123").
    pub vehicle: String,
    available: bool,
    /// Accepted trips, in acceptance order.
    history: Vec<TripId>,
}

impl Driver {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        vehicle: impl Into<String>,
    ) -> CoreResult<Self> {
        let profile = Profile::new(id, name, phone)?;
        let vehicle = vehicle.into();
        validate_required("vehicle", &vehicle)?;

        Ok(Driver {
            profile,
            vehicle,
            available: true,
            history: Vec::new(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Flips availability and returns the new value.
    pub fn toggle_availability(&mut self) -> bool {
        self.available = !self.available;
        self.available
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl Identity for Driver {
    const KIND: EntityKind = EntityKind::Driver;

    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn history(&self) -> &[TripId] {
        &self.history
    }

    fn record_trip(&mut self, trip_id: TripId) {
        self.history.push(trip_id);
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Vehicle: {}, {}",
            self.profile,
            self.vehicle,
            if self.available {
                "available"
            } else {
                "not available"
            }
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
