//! # History Tracker
//!
//! Per-rider and per-driver trip logs.
//!
//! ## When Entries Are Written
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  accept_trip ────► driver history += trip_id                           │
//! │                                                                         │
//! │  complete_trip ──► rider history  += trip_id                           │
//! │                                                                         │
//! │  cancel_trip ────► (nothing; an accepted trip stays in the driver log) │
//! │                                                                         │
//! │  Logs are append-only. They hold ids; reads resolve them against the   │
//! │  engine's trip arena so they always show current trip state.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use ride_core::{EntityKind, Identity, Trip, TripId};

/// A resolved history, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct TripHistory {
    pub owner_kind: EntityKind,
    pub owner_id: String,
    pub owner_name: String,
    /// Oldest first.
    pub trips: Vec<Trip>,
}

impl TripHistory {
    /// Resolves an identity's log against the trip arena.
    pub(crate) fn resolve<T: Identity>(owner: &T, trips: &BTreeMap<TripId, Trip>) -> Self {
        TripHistory {
            owner_kind: T::KIND,
            owner_id: owner.id().to_string(),
            owner_name: owner.name().to_string(),
            trips: resolve_ids(owner.history(), trips),
        }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn trip_ids(&self) -> Vec<TripId> {
        self.trips.iter().map(Trip::id).collect()
    }
}

/// Heading line, then one line per trip.
///
/// ```text
/// Alice's Ride History:
/// Trip 1: Rider - Alice, From - Home, To - Work, Fare - 15, Status - Completed
/// ```
impl fmt::Display for TripHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (title, empty) = match self.owner_kind {
            EntityKind::Driver => ("Trip", "No trips found."),
            _ => ("Ride", "No rides found."),
        };

        writeln!(f, "{}'s {} History:", self.owner_name, title)?;
        if self.trips.is_empty() {
            return write!(f, "{}", empty);
        }

        let mut lines = self.trips.iter().peekable();
        while let Some(trip) = lines.next() {
            if lines.peek().is_some() {
                writeln!(f, "{}", trip)?;
            } else {
                write!(f, "{}", trip)?;
            }
        }
        Ok(())
    }
}

/// Maps ids to trip snapshots, preserving order. Ids missing from the arena
/// are skipped; the engine never removes trips, so that only happens for
/// foreign ids.
pub(crate) fn resolve_ids(ids: &[TripId], trips: &BTreeMap<TripId, Trip>) -> Vec<Trip> {
    ids.iter().filter_map(|id| trips.get(id).cloned()).collect()
}
