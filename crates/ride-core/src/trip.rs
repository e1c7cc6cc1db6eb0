//! # Trip
//!
//! One ride from request to completion, and the only place its status
//! changes.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐   start()    ┌────────────┐    end()    ┌───────────┐     │
//! │   │ Pending │─────────────►│ InProgress │────────────►│ Completed │     │
//! │   └────┬────┘              └─────┬──────┘             └───────────┘     │
//! │        │                         │                                      │
//! │        │        cancel()         │                                      │
//! │        └────────────┬────────────┘                                      │
//! │                     ▼                                                   │
//! │               ┌───────────┐                                             │
//! │               │ Cancelled │                                             │
//! │               └───────────┘                                             │
//! │                                                                         │
//! │  Nothing ever returns to Pending. Completed and Cancelled are final.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fare::{calculate_fare, Fare};
use crate::validation::validate_required;

// =============================================================================
// Trip ID
// =============================================================================

/// Sequential trip identifier. The engine hands them out starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(u64);

impl TripId {
    /// First identifier handed out by a fresh engine.
    pub const FIRST: TripId = TripId(1);

    #[inline]
    pub const fn new(id: u64) -> Self {
        TripId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The identifier after this one.
    #[inline]
    pub const fn next(&self) -> Self {
        TripId(self.0 + 1)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Trip Status
// =============================================================================

/// Where a trip is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    /// Requested, waiting for a driver.
    #[default]
    Pending,
    /// Accepted by a driver with an agreed fare.
    InProgress,
    /// Finished.
    Completed,
    /// Withdrawn before completion.
    Cancelled,
}

impl TripStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripStatus::Pending => write!(f, "Pending"),
            TripStatus::InProgress => write!(f, "In Progress"),
            TripStatus::Completed => write!(f, "Completed"),
            TripStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

// =============================================================================
// Trip
// =============================================================================

/// A ride request and everything that happened to it.
///
/// ## Snapshot Fields
/// `rider_name` is frozen at request time. Renaming or re-registering the
/// rider later does not change what the trip shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    id: TripId,
    rider_id: String,
    /// Rider display name at time of request (frozen).
    rider_name: String,
    start: String,
    destination: String,
    fare: Fare,
    status: TripStatus,
    /// Set when a driver accepts the trip.
    driver_id: Option<String>,
    requested_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    /// Set on completion or cancellation.
    closed_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Creates a pending trip with a zero fare.
    ///
    /// Fails with a validation error if the rider name, start or
    /// destination is empty.
    pub fn new(
        id: TripId,
        rider_id: impl Into<String>,
        rider_name: impl Into<String>,
        start: impl Into<String>,
        destination: impl Into<String>,
    ) -> CoreResult<Self> {
        let rider_id = rider_id.into();
        let rider_name = rider_name.into();
        let start = start.into();
        let destination = destination.into();

        validate_required("rider id", &rider_id)?;
        validate_required("rider name", &rider_name)?;
        validate_required("start location", &start)?;
        validate_required("destination", &destination)?;

        Ok(Trip {
            id,
            rider_id,
            rider_name,
            start,
            destination,
            fare: Fare::zero(),
            status: TripStatus::Pending,
            driver_id: None,
            requested_at: Utc::now(),
            started_at: None,
            closed_at: None,
        })
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// `Pending → InProgress`, recording the accepting driver.
    pub fn start(&mut self, driver_id: impl Into<String>) -> CoreResult<()> {
        self.ensure_status(TripStatus::Pending, "start")?;
        self.status = TripStatus::InProgress;
        self.driver_id = Some(driver_id.into());
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Sets the agreed fare. Allowed in any status; callers validate the
    /// amount before getting here.
    pub fn set_fare(&mut self, fare: Fare) {
        self.fare = fare;
    }

    /// `InProgress → Completed`.
    pub fn end(&mut self) -> CoreResult<()> {
        self.ensure_status(TripStatus::InProgress, "end")?;
        self.status = TripStatus::Completed;
        self.closed_at = Some(Utc::now());
        Ok(())
    }

    /// `Pending | InProgress → Cancelled`.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(self.transition_error("cancel"));
        }
        self.status = TripStatus::Cancelled;
        self.closed_at = Some(Utc::now());
        Ok(())
    }

    /// Suggested fare for this trip's locations. Never applied
    /// automatically.
    pub fn calculate_fare(&self) -> Fare {
        calculate_fare(&self.start, &self.destination)
    }

    fn ensure_status(&self, expected: TripStatus, action: &'static str) -> CoreResult<()> {
        if self.status != expected {
            return Err(self.transition_error(action));
        }
        Ok(())
    }

    fn transition_error(&self, action: &'static str) -> CoreError {
        CoreError::InvalidStateTransition {
            trip_id: self.id,
            from: self.status,
            action,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> TripId {
        self.id
    }

    pub fn rider_id(&self) -> &str {
        &self.rider_id
    }

    pub fn rider_name(&self) -> &str {
        &self.rider_name
    }

    pub fn start_location(&self) -> &str {
        &self.start
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn fare(&self) -> Fare {
        self.fare
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    /// The driver that accepted the trip, if any.
    pub fn driver_id(&self) -> Option<&str> {
        self.driver_id.as_deref()
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }
}

/// One-line trip summary.
///
/// ```text
/// Trip 1: Rider - Alice, From - Home, To - Work, Fare - 15, Status - Completed
/// ```
impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trip {}: Rider - {}, From - {}, To - {}, Fare - {}, Status - {}",
            self.id, self.rider_name, self.start, self.destination, self.fare, self.status
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
