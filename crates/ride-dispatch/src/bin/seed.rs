//! # Demo Data Seeder
//!
//! Builds a dispatch engine with sample riders, drivers and trips, then
//! prints a JSON snapshot of it.
//!
//! ## Usage
//! ```bash
//! # Default config location
//! cargo run -p ride-dispatch --bin seed
//!
//! # Explicit config file
//! cargo run -p ride-dispatch --bin seed -- --config ./dispatch.toml
//!
//! # Only print the snapshot, no summary
//! cargo run -p ride-dispatch --bin seed -- --quiet
//! ```
//!
//! ## Generated Data
//! - Three riders and three drivers, one driver toggled off
//! - One trip per rider, fare suggested by the length formula
//! - First trip completed, second left in progress, third cancelled

use std::env;
use std::path::PathBuf;

use ride_core::{calculate_fare, Fare, Identity};
use ride_dispatch::{DispatchConfig, DispatchEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

const RIDERS: &[(&str, &str, &str)] = &[
    ("R1", "Alice", "5551234567"),
    ("R2", "Carol", "5559876543"),
    ("R3", "Erin", "15550001234"),
];

const DRIVERS: &[(&str, &str, &str, &str)] = &[
    ("D1", "Bob", "15551234567", "Car"),
    ("D2", "Dan", "5550001111", "Van"),
    ("D3", "Faye", "5552223333", "Bike"),
];

const ROUTES: &[(&str, &str)] = &[
    ("Home", "Work"),
    ("Central Station", "Airport"),
    ("Mall", "Riverside Park"),
];

/// Minimum fare when the length formula suggests nothing.
const FLOOR_FARE: f64 = 5.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => {
                println!("Ride Dispatch Demo Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file path (default: platform config dir)");
                println!("  -q, --quiet          Print only the JSON snapshot");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = DispatchConfig::load_or_default(config_path);
    init_tracing(&config.logging.filter);

    let engine = DispatchEngine::from_config(&config);
    info!(
        single_trip_per_driver = engine.settings().single_trip_per_driver,
        "Seeding dispatch engine"
    );

    for (id, name, phone) in RIDERS {
        engine.register_rider(id, name, phone)?;
    }
    for (id, name, phone, vehicle) in DRIVERS {
        engine.register_driver(id, name, phone, vehicle)?;
    }
    engine.toggle_availability("D3")?;

    let mut trips = Vec::new();
    for ((rider_id, _, _), (start, destination)) in RIDERS.iter().zip(ROUTES) {
        trips.push(engine.request_ride(rider_id, start, destination)?);
    }

    // Pair trips with available drivers in listing order.
    let drivers = engine.available_drivers();
    for (trip, driver) in trips.iter().zip(drivers.iter()) {
        let suggested = calculate_fare(trip.start_location(), trip.destination());
        let fare = if suggested.is_payable() {
            suggested
        } else {
            Fare::new(FLOOR_FARE)
        };
        engine.accept_trip(driver.id(), trip.id(), trip.rider_id(), fare)?;
    }

    if let (Some(trip), Some(driver)) = (trips.first(), drivers.first()) {
        engine.complete_trip(trip.id(), trip.rider_id(), driver.id())?;
    }
    if let Some(trip) = trips.get(2) {
        engine.cancel_trip(trip.id())?;
    }

    if !quiet {
        for rider in engine.riders() {
            println!("{}", engine.rider_history(rider.id())?);
            println!();
        }
        for driver in engine.drivers() {
            println!("{}", driver);
            println!("{}", engine.driver_history(driver.id())?);
            println!();
        }
    }

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the configured
/// filter.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
