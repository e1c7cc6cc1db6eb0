use std::collections::HashSet;

use ride_core::{CoreError, Fare, Identity, TripId, TripStatus, UnavailableReason};
use ride_dispatch::{DispatchEngine, EngineSettings, ErrorCode, ErrorResponse};

fn seeded_engine() -> DispatchEngine {
    let engine = DispatchEngine::new();
    engine
        .register_rider("R1", "Alice", "5551234567")
        .expect("register rider");
    engine
        .register_driver("D1", "Bob", "15551234567", "Car")
        .expect("register driver");
    engine
}

#[test]
fn request_accept_complete_walkthrough() {
    let engine = seeded_engine();

    let trip = engine.request_ride("R1", "Home", "Work").expect("request");
    assert_eq!(trip.id(), TripId::new(1));
    assert_eq!(trip.status(), TripStatus::Pending);
    assert_eq!(engine.pending_trips(), vec![trip.clone()]);

    let accepted = engine
        .accept_trip("D1", trip.id(), "R1", Fare::new(15.0))
        .expect("accept");
    assert_eq!(accepted.status(), TripStatus::InProgress);
    assert_eq!(accepted.fare(), Fare::new(15.0));
    assert!(engine.pending_trips().is_empty());
    assert_eq!(
        engine.driver_history("D1").expect("history").trip_ids(),
        vec![trip.id()]
    );

    let completed = engine
        .complete_trip(trip.id(), "R1", "D1")
        .expect("complete");
    assert_eq!(completed.status(), TripStatus::Completed);
    assert_eq!(engine.completed_trips(), vec![completed.clone()]);

    let rider_history = engine.rider_history("R1").expect("history");
    assert_eq!(rider_history.trip_ids(), vec![trip.id()]);
    assert_eq!(
        rider_history.to_string(),
        "Alice's Ride History:\n\
         Trip 1: Rider - Alice, From - Home, To - Work, Fare - 15, Status - Completed"
    );
}

#[test]
fn phone_validation_grid() {
    let engine = DispatchEngine::new();
    let valid = ["5551234567", "15551234567", "0000000000"];
    let invalid = [
        "",
        "555123456",
        "555123456789",
        "555-123-456",
        "55512345a7",
        " 5551234567",
        "５５５１２３４５６７",
    ];

    for (n, phone) in valid.iter().enumerate() {
        let id = format!("V{n}");
        assert!(
            engine.register_rider(&id, "Valid", phone).is_ok(),
            "{phone:?} should be accepted"
        );
        assert!(engine.register_driver(&id, "Valid", phone, "Car").is_ok());
    }

    for (n, phone) in invalid.iter().enumerate() {
        let id = format!("X{n}");
        let err = engine.register_rider(&id, "Invalid", phone).unwrap_err();
        assert!(
            matches!(err, CoreError::Validation(_)),
            "{phone:?} should be rejected, got {err}"
        );
        assert!(engine.find_rider(&id).is_err());
    }

    assert_eq!(engine.riders().len(), valid.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn trip_ids_are_unique_under_concurrent_requests() {
    let engine = DispatchEngine::new();
    for n in 0..8 {
        engine
            .register_rider(&format!("R{n}"), "Rider", "5551234567")
            .expect("register");
    }

    let mut handles = Vec::new();
    for n in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let rider_id = format!("R{n}");
            (0..25)
                .map(|_| {
                    engine
                        .request_ride(&rider_id, "Home", "Work")
                        .expect("request")
                        .id()
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let ids = handle.await.expect("join");
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert!(seen.insert(id), "duplicate trip id {id}");
        }
    }

    assert_eq!(seen.len(), 200);
    assert_eq!(seen.iter().max(), Some(&TripId::new(200)));
    assert_eq!(engine.pending_trips().len(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn a_trip_is_accepted_exactly_once() {
    let engine = seeded_engine();
    for n in 2..=6 {
        engine
            .register_driver(&format!("D{n}"), "Driver", "5550001111", "Car")
            .expect("register");
    }
    let trip = engine.request_ride("R1", "Home", "Work").expect("request");

    let mut handles = Vec::new();
    for n in 1..=6 {
        let engine = engine.clone();
        let trip_id = trip.id();
        handles.push(tokio::task::spawn_blocking(move || {
            engine.accept_trip(&format!("D{n}"), trip_id, "R1", Fare::new(10.0))
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.expect("join") {
            Ok(_) => winners += 1,
            Err(err) => assert!(matches!(
                err,
                CoreError::RideNotAvailable {
                    reason: UnavailableReason::TripNotPending,
                    ..
                }
            )),
        }
    }
    assert_eq!(winners, 1);

    let accepted_by: usize = engine
        .drivers()
        .iter()
        .map(|d| engine.driver_history(d.id()).expect("history").len())
        .sum();
    assert_eq!(accepted_by, 1);
}

#[test]
fn accept_on_non_pending_trip_changes_nothing() {
    let engine = seeded_engine();
    let trip = engine.request_ride("R1", "Home", "Work").expect("request");
    engine
        .accept_trip("D1", trip.id(), "R1", Fare::new(15.0))
        .expect("accept");

    let before = engine.snapshot();
    for trip_id in [trip.id(), TripId::new(99)] {
        let err = engine
            .accept_trip("D1", trip_id, "R1", Fare::new(15.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::RideNotAvailable { .. }));
        assert_eq!(ErrorResponse::from(&err).code, ErrorCode::RideNotAvailable);
    }
    let after = engine.snapshot();

    assert_eq!(before.pending, after.pending);
    assert_eq!(before.completed, after.completed);
    assert_eq!(before.drivers, after.drivers);
}

#[test]
fn completing_twice_fails_the_second_time() {
    let engine = seeded_engine();
    let trip = engine.request_ride("R1", "Home", "Work").expect("request");
    engine
        .accept_trip("D1", trip.id(), "R1", Fare::new(15.0))
        .expect("accept");
    engine
        .complete_trip(trip.id(), "R1", "D1")
        .expect("complete");

    let err = engine.complete_trip(trip.id(), "R1", "D1").unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidStateTransition {
            from: TripStatus::Completed,
            ..
        }
    ));
    assert_eq!(engine.completed_trips().len(), 1);
    assert_eq!(engine.rider_history("R1").expect("history").len(), 1);
}

#[test]
fn toggling_twice_restores_availability() {
    let engine = seeded_engine();
    let original = engine.find_driver("D1").expect("driver").is_available();

    assert_eq!(engine.toggle_availability("D1").expect("toggle"), !original);
    assert!(engine.available_drivers().is_empty());
    assert_eq!(engine.toggle_availability("D1").expect("toggle"), original);
    assert_eq!(engine.available_drivers().len(), 1);

    assert!(engine.toggle_availability("D9").is_err());
}

#[test]
fn declined_completion_leaves_trip_in_progress_until_cancelled() {
    let engine = seeded_engine();
    let trip = engine.request_ride("R1", "Home", "Work").expect("request");
    engine
        .accept_trip("D1", trip.id(), "R1", Fare::new(15.0))
        .expect("accept");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.in_progress.len(), 1);
    assert!(snapshot.pending.is_empty());
    assert!(snapshot.completed.is_empty());

    let cancelled = engine.cancel_trip(trip.id()).expect("cancel");
    assert_eq!(cancelled.status(), TripStatus::Cancelled);
    assert!(cancelled.closed_at().is_some());
    assert!(engine.snapshot().in_progress.is_empty());
    assert_eq!(engine.cancelled_trips(), vec![cancelled]);
}

#[test]
fn single_trip_policy_blocks_second_accept() {
    let engine = DispatchEngine::with_settings(EngineSettings {
        single_trip_per_driver: true,
    });
    engine
        .register_rider("R1", "Alice", "5551234567")
        .expect("register");
    engine
        .register_driver("D1", "Bob", "15551234567", "Car")
        .expect("register");

    let first = engine.request_ride("R1", "Home", "Work").expect("request");
    let second = engine.request_ride("R1", "Work", "Home").expect("request");
    engine
        .accept_trip("D1", first.id(), "R1", Fare::new(10.0))
        .expect("accept");

    let err = engine
        .accept_trip("D1", second.id(), "R1", Fare::new(10.0))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::RideNotAvailable {
            reason: UnavailableReason::DriverUnavailable,
            ..
        }
    ));
    assert_eq!(engine.pending_trips().len(), 1);
}

#[test]
fn failed_registration_is_all_or_nothing() {
    let engine = seeded_engine();

    assert!(engine.register_driver("D2", "Dan", "5550001111", "").is_err());
    assert!(engine.register_driver("D1", "Imposter", "5550001111", "Van").is_err());
    assert!(engine.register_rider("R2", "", "5550001111").is_err());

    assert_eq!(engine.drivers().len(), 1);
    assert_eq!(engine.find_driver("D1").expect("driver").name(), "Bob");
    assert!(engine.find_rider("R2").is_err());
}

#[test]
fn whitespace_is_a_valid_string() {
    let engine = seeded_engine();

    let rider = engine
        .register_rider(" ", "  ", "5550001111")
        .expect("whitespace id and name");
    assert_eq!(rider.name(), "  ");
    assert_eq!(engine.find_rider(" ").expect("lookup").id(), " ");

    let trip = engine.request_ride("R1", " ", "Work").expect("request");
    assert_eq!(trip.start_location(), " ");
    assert_eq!(engine.pending_trips(), vec![trip]);

    assert!(engine.request_ride("R1", "", "Work").is_err());
}
