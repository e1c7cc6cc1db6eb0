//! # Dispatch Engine
//!
//! Coordinates ride requests, matching and completion over one shared,
//! lock-guarded state.
//!
//! ## Trip Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  request_ride ──► trips[id] = Pending, pending.push(id)                │
//! │                                                                         │
//! │  accept_trip ───► checks: driver, rider, pending, owner, available,    │
//! │                   fare > 0                                             │
//! │                   trip.start(), trip.set_fare(), pending.remove(id),   │
//! │                   driver.history.push(id)                              │
//! │                                                                         │
//! │                   (in flight: only in the arena, in no collection)     │
//! │                                                                         │
//! │  complete_trip ─► checks: rider, driver, trip InProgress, assignment   │
//! │                   trip.end(), completed.push(id),                      │
//! │                   rider.history.push(id)                               │
//! │                                                                         │
//! │  cancel_trip ───► trip.cancel(), pending.remove(id) if pending,        │
//! │                   cancelled.push(id)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! All state lives in one `Arc<RwLock<DispatchState>>`. Mutations take the
//! write lock for their whole check-then-apply sequence, so two drivers can
//! never both accept the same trip and trip ids never collide. Listings take
//! the read lock and clone what they return, so they never observe a
//! half-applied operation and may run alongside each other.
//!
//! Every operation finishes its checks before its first write. A failed call
//! therefore leaves the state untouched, which is also why a poisoned lock
//! is safe to recover.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use ride_core::{
    CoreError, CoreResult, Driver, EntityKind, Fare, Identity, Rider, Trip, TripId, TripStatus,
    UnavailableReason,
};

use crate::config::{DispatchConfig, EngineSettings};
use crate::history::{resolve_ids, TripHistory};
use crate::registry::Registry;

// =============================================================================
// Dispatch State
// =============================================================================

/// Everything the engine guards.
#[derive(Debug)]
struct DispatchState {
    riders: Registry<Rider>,
    drivers: Registry<Driver>,
    /// Every trip ever created. Never shrinks.
    trips: BTreeMap<TripId, Trip>,
    /// Pending trips, request order.
    pending: Vec<TripId>,
    /// Completed trips, completion order.
    completed: Vec<TripId>,
    /// Cancelled trips, cancellation order.
    cancelled: Vec<TripId>,
    /// Drivers whose availability was cleared by the single-trip policy and
    /// has not been touched by hand since.
    held: HashSet<String>,
    next_trip_id: TripId,
}

impl DispatchState {
    fn new() -> Self {
        DispatchState {
            riders: Registry::new(),
            drivers: Registry::new(),
            trips: BTreeMap::new(),
            pending: Vec::new(),
            completed: Vec::new(),
            cancelled: Vec::new(),
            held: HashSet::new(),
            next_trip_id: TripId::FIRST,
        }
    }

    fn trip(&self, trip_id: TripId) -> CoreResult<&Trip> {
        self.trips
            .get(&trip_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Trip, trip_id.to_string()))
    }

    fn trip_mut(&mut self, trip_id: TripId) -> CoreResult<&mut Trip> {
        self.trips
            .get_mut(&trip_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Trip, trip_id.to_string()))
    }

    fn pending_position(&self, trip_id: TripId) -> Option<usize> {
        self.pending.iter().position(|id| *id == trip_id)
    }

    /// Hands a policy-held driver back once their last in-progress trip is
    /// closed. A driver who toggled themselves since is left alone.
    fn release_driver(&mut self, driver_id: &str) -> CoreResult<()> {
        let busy = self
            .trips
            .values()
            .any(|t| t.status() == TripStatus::InProgress && t.driver_id() == Some(driver_id));
        if busy || !self.held.remove(driver_id) {
            return Ok(());
        }

        self.drivers.get_mut(driver_id)?.set_available(true);
        debug!(driver_id, "Driver released by single-trip policy");
        Ok(())
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Consistent, serializable copy of the whole engine.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSnapshot {
    pub taken_at: DateTime<Utc>,
    pub riders: Vec<Rider>,
    pub drivers: Vec<Driver>,
    pub pending: Vec<Trip>,
    /// Accepted but not yet completed or cancelled.
    pub in_progress: Vec<Trip>,
    pub completed: Vec<Trip>,
    pub cancelled: Vec<Trip>,
    pub next_trip_id: TripId,
}

// =============================================================================
// Dispatch Engine
// =============================================================================

/// Shared handle to one dispatch system.
///
/// Cloning is cheap and every clone sees the same state.
///
/// ## Usage
/// ```rust
/// use ride_core::{Fare, TripStatus};
/// use ride_dispatch::DispatchEngine;
///
/// let engine = DispatchEngine::new();
/// engine.register_rider("R1", "Alice", "5551234567").unwrap();
/// engine.register_driver("D1", "Bob", "15551234567", "Car").unwrap();
///
/// let trip = engine.request_ride("R1", "Home", "Work").unwrap();
/// engine.accept_trip("D1", trip.id(), "R1", Fare::new(15.0)).unwrap();
/// let done = engine.complete_trip(trip.id(), "R1", "D1").unwrap();
///
/// assert_eq!(done.status(), TripStatus::Completed);
/// ```
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    state: Arc<RwLock<DispatchState>>,
    settings: EngineSettings,
}

impl Default for DispatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchEngine {
    /// Creates an empty engine with default settings.
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        DispatchEngine {
            state: Arc::new(RwLock::new(DispatchState::new())),
            settings,
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::with_settings(config.engine.clone())
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn read(&self) -> RwLockReadGuard<'_, DispatchState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DispatchState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Registers a rider. Fails on a bad phone, an empty id or name, or an
    /// id already used by another rider.
    pub fn register_rider(&self, id: &str, name: &str, phone: &str) -> CoreResult<Rider> {
        let rider = Rider::new(id, name, phone).map_err(|e| rejected("register_rider", e))?;

        let mut state = self.write();
        let rider = state
            .riders
            .register(rider)
            .map_err(|e| rejected("register_rider", e))?
            .clone();

        info!(
            rider_id = %rider.id(),
            name = %rider.name(),
            riders = state.riders.len(),
            "Rider registered"
        );
        Ok(rider)
    }

    /// Registers a driver, initially available. Driver ids are independent
    /// of rider ids.
    pub fn register_driver(
        &self,
        id: &str,
        name: &str,
        phone: &str,
        vehicle: &str,
    ) -> CoreResult<Driver> {
        let driver =
            Driver::new(id, name, phone, vehicle).map_err(|e| rejected("register_driver", e))?;

        let mut state = self.write();
        let driver = state
            .drivers
            .register(driver)
            .map_err(|e| rejected("register_driver", e))?
            .clone();

        info!(
            driver_id = %driver.id(),
            name = %driver.name(),
            vehicle = %driver.vehicle,
            drivers = state.drivers.len(),
            "Driver registered"
        );
        Ok(driver)
    }

    pub fn find_rider(&self, id: &str) -> CoreResult<Rider> {
        self.read().riders.get(id).cloned()
    }

    pub fn find_driver(&self, id: &str) -> CoreResult<Driver> {
        self.read().drivers.get(id).cloned()
    }

    /// Flips a driver's availability and returns the new value.
    ///
    /// A manual toggle takes the driver out of single-trip policy control:
    /// closing their trips no longer changes the flag.
    pub fn toggle_availability(&self, driver_id: &str) -> CoreResult<bool> {
        let mut state = self.write();
        let state = &mut *state;
        let driver = state
            .drivers
            .get_mut(driver_id)
            .map_err(|e| rejected("toggle_availability", e))?;

        let available = driver.toggle_availability();
        state.held.remove(driver_id);
        debug!(driver_id, available, "Driver availability toggled");
        Ok(available)
    }

    /// All riders, registration order.
    pub fn riders(&self) -> Vec<Rider> {
        self.read().riders.iter().cloned().collect()
    }

    /// All drivers, registration order.
    pub fn drivers(&self) -> Vec<Driver> {
        self.read().drivers.iter().cloned().collect()
    }

    /// Drivers whose availability flag is on, registration order.
    pub fn available_drivers(&self) -> Vec<Driver> {
        let drivers: Vec<Driver> = self
            .read()
            .drivers
            .iter()
            .filter(|d| d.is_available())
            .cloned()
            .collect();

        debug!(count = drivers.len(), "Listed available drivers");
        drivers
    }

    // =========================================================================
    // Trip Lifecycle
    // =========================================================================

    /// Creates a pending trip for a registered rider.
    ///
    /// No check for duplicate requests or for available drivers. The trip id
    /// is consumed only when the trip is actually created.
    pub fn request_ride(&self, rider_id: &str, start: &str, destination: &str) -> CoreResult<Trip> {
        let mut state = self.write();
        let state = &mut *state;

        let rider = state
            .riders
            .get(rider_id)
            .map_err(|e| rejected("request_ride", e))?;
        let trip = Trip::new(
            state.next_trip_id,
            rider.id(),
            rider.name(),
            start,
            destination,
        )
        .map_err(|e| rejected("request_ride", e))?;

        let trip_id = trip.id();
        state.next_trip_id = trip_id.next();
        state.pending.push(trip_id);
        state.trips.insert(trip_id, trip.clone());

        info!(trip_id = %trip_id, rider_id, start, destination, "Ride requested");
        Ok(trip)
    }

    /// Binds a driver to a pending trip at an agreed fare.
    ///
    /// ## Checks (in order)
    /// 1. Driver and rider are registered (`NotFound`)
    /// 2. Trip is in the pending collection (`RideNotAvailable`)
    /// 3. Trip was requested by `rider_id` (`RideNotAvailable`)
    /// 4. Driver is available (`RideNotAvailable`)
    /// 5. Fare is finite and positive (`InvalidFare`)
    ///
    /// On success the trip is `InProgress`, out of the pending collection and
    /// in the driver's history. Rider state is not touched. Availability is
    /// only cleared under the single-trip-per-driver policy.
    pub fn accept_trip(
        &self,
        driver_id: &str,
        trip_id: TripId,
        rider_id: &str,
        fare: Fare,
    ) -> CoreResult<Trip> {
        let mut state = self.write();
        self.apply_accept(&mut state, driver_id, trip_id, rider_id, fare)
            .map_err(|e| rejected("accept_trip", e))
    }

    fn apply_accept(
        &self,
        state: &mut DispatchState,
        driver_id: &str,
        trip_id: TripId,
        rider_id: &str,
        fare: Fare,
    ) -> CoreResult<Trip> {
        let driver_available = state.drivers.get(driver_id)?.is_available();
        state.riders.get(rider_id)?;

        let slot = state
            .pending_position(trip_id)
            .ok_or(CoreError::RideNotAvailable {
                trip_id,
                reason: UnavailableReason::TripNotPending,
            })?;
        if state.trip(trip_id)?.rider_id() != rider_id {
            return Err(CoreError::RideNotAvailable {
                trip_id,
                reason: UnavailableReason::RiderMismatch,
            });
        }
        if !driver_available {
            return Err(CoreError::RideNotAvailable {
                trip_id,
                reason: UnavailableReason::DriverUnavailable,
            });
        }
        if !fare.is_payable() {
            return Err(CoreError::InvalidFare {
                fare: fare.amount(),
            });
        }

        let trip = state.trip_mut(trip_id)?;
        trip.start(driver_id)?;
        trip.set_fare(fare);
        let trip = trip.clone();

        state.pending.remove(slot);
        let driver = state.drivers.get_mut(driver_id)?;
        driver.record_trip(trip_id);
        if self.settings.single_trip_per_driver {
            driver.set_available(false);
            state.held.insert(driver_id.to_string());
        }

        info!(trip_id = %trip_id, driver_id, rider_id, fare = fare.amount(), "Trip accepted");
        Ok(trip)
    }

    /// Marks an accepted trip as completed.
    ///
    /// ## Checks (in order)
    /// 1. Rider and driver are registered, trip exists (`NotFound`)
    /// 2. Trip is `InProgress` (`InvalidStateTransition`)
    /// 3. Trip was accepted by `driver_id` and requested by `rider_id`
    ///    (`RideNotAvailable`)
    ///
    /// A caller that decides the ride did not happen simply never calls
    /// this; the trip then stays `InProgress` until cancelled.
    pub fn complete_trip(
        &self,
        trip_id: TripId,
        rider_id: &str,
        driver_id: &str,
    ) -> CoreResult<Trip> {
        let mut state = self.write();
        self.apply_complete(&mut state, trip_id, rider_id, driver_id)
            .map_err(|e| rejected("complete_trip", e))
    }

    fn apply_complete(
        &self,
        state: &mut DispatchState,
        trip_id: TripId,
        rider_id: &str,
        driver_id: &str,
    ) -> CoreResult<Trip> {
        state.riders.get(rider_id)?;
        state.drivers.get(driver_id)?;

        let trip = state.trip(trip_id)?;
        if trip.status() != TripStatus::InProgress {
            return Err(CoreError::InvalidStateTransition {
                trip_id,
                from: trip.status(),
                action: "complete",
            });
        }
        if trip.driver_id() != Some(driver_id) {
            return Err(CoreError::RideNotAvailable {
                trip_id,
                reason: UnavailableReason::DriverMismatch,
            });
        }
        if trip.rider_id() != rider_id {
            return Err(CoreError::RideNotAvailable {
                trip_id,
                reason: UnavailableReason::RiderMismatch,
            });
        }

        let trip = state.trip_mut(trip_id)?;
        trip.end()?;
        let trip = trip.clone();

        state.completed.push(trip_id);
        state.riders.get_mut(rider_id)?.record_trip(trip_id);
        if self.settings.single_trip_per_driver {
            state.release_driver(driver_id)?;
        }

        info!(
            trip_id = %trip_id,
            rider_id,
            driver_id,
            fare = trip.fare().amount(),
            "Trip completed"
        );
        Ok(trip)
    }

    /// Withdraws a pending or in-progress trip.
    ///
    /// Pending trips leave the pending collection. In-progress trips stay in
    /// their driver's history; under the single-trip-per-driver policy the
    /// driver becomes available again.
    pub fn cancel_trip(&self, trip_id: TripId) -> CoreResult<Trip> {
        let mut state = self.write();
        self.apply_cancel(&mut state, trip_id)
            .map_err(|e| rejected("cancel_trip", e))
    }

    fn apply_cancel(&self, state: &mut DispatchState, trip_id: TripId) -> CoreResult<Trip> {
        let slot = state.pending_position(trip_id);
        let trip = state.trip_mut(trip_id)?;
        let was = trip.status();
        trip.cancel()?;
        let trip = trip.clone();

        if let Some(slot) = slot {
            state.pending.remove(slot);
        }
        state.cancelled.push(trip_id);

        if was == TripStatus::InProgress && self.settings.single_trip_per_driver {
            if let Some(driver_id) = trip.driver_id() {
                state.release_driver(driver_id)?;
            }
        }

        info!(trip_id = %trip_id, from = %was, "Trip cancelled");
        Ok(trip)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Looks up any trip by id, whatever its status.
    pub fn find_trip(&self, trip_id: TripId) -> CoreResult<Trip> {
        self.read().trip(trip_id).cloned()
    }

    /// Pending trips in request order.
    pub fn pending_trips(&self) -> Vec<Trip> {
        let state = self.read();
        resolve_ids(&state.pending, &state.trips)
    }

    /// Completed trips in completion order.
    pub fn completed_trips(&self) -> Vec<Trip> {
        let state = self.read();
        resolve_ids(&state.completed, &state.trips)
    }

    /// Cancelled trips in cancellation order.
    pub fn cancelled_trips(&self) -> Vec<Trip> {
        let state = self.read();
        resolve_ids(&state.cancelled, &state.trips)
    }

    /// Trips a rider has completed.
    pub fn rider_history(&self, rider_id: &str) -> CoreResult<TripHistory> {
        let state = self.read();
        let rider = state.riders.get(rider_id)?;
        Ok(TripHistory::resolve(rider, &state.trips))
    }

    /// Trips a driver has accepted.
    pub fn driver_history(&self, driver_id: &str) -> CoreResult<TripHistory> {
        let state = self.read();
        let driver = state.drivers.get(driver_id)?;
        Ok(TripHistory::resolve(driver, &state.trips))
    }

    /// Copies the whole state under one read lock.
    pub fn snapshot(&self) -> DispatchSnapshot {
        let state = self.read();
        DispatchSnapshot {
            taken_at: Utc::now(),
            riders: state.riders.iter().cloned().collect(),
            drivers: state.drivers.iter().cloned().collect(),
            pending: resolve_ids(&state.pending, &state.trips),
            in_progress: state
                .trips
                .values()
                .filter(|t| t.status() == TripStatus::InProgress)
                .cloned()
                .collect(),
            completed: resolve_ids(&state.completed, &state.trips),
            cancelled: resolve_ids(&state.cancelled, &state.trips),
            next_trip_id: state.next_trip_id,
        }
    }
}

fn rejected(operation: &'static str, err: CoreError) -> CoreError {
    warn!(
        operation,
        error = %err,
        input_error = err.is_input_error(),
        "Dispatch operation rejected"
    );
    err
}

// =============================================================================
// Unit Tests
// =============================================================================
