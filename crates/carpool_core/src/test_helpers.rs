//! Test helpers for common fixture setup.
//!
//! Shared by module tests and benchmarks. Defaults are deterministic so a
//! scenario's interesting fields stand out at the call site.

use chrono::{DateTime, TimeZone, Utc};

use crate::geo::Coordinate;
use crate::people::{Driver, EventContext, Gender, GenderPreference, Passenger, TripDirection};

/// Venue used across tests: downtown San Francisco.
pub const EVENT_COORDINATE: Coordinate = Coordinate {
    lat: 37.7749,
    lng: -122.4194,
};

/// UTC timestamp shorthand.
///
/// # Panics
///
/// Panics on an impossible calendar date (a test bug).
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}

/// A ride-needing passenger at the given home location.
pub fn passenger(id: &str, lat: f64, lng: f64) -> Passenger {
    Passenger {
        id: id.to_string(),
        name: format!("Passenger {id}"),
        gender: Gender::Female,
        age: 30,
        home_coordinate: Some(Coordinate::new(lat, lng)),
        leaving_early: false,
        early_departure_time: None,
        needs_ride: true,
        gender_preference: GenderPreference::Any,
    }
}

/// A driving driver at the given home location with the given seat count.
pub fn driver(id: &str, lat: f64, lng: f64, seats: u32) -> Driver {
    Driver {
        id: id.to_string(),
        name: format!("Driver {id}"),
        gender: Gender::Female,
        age: 35,
        home_coordinate: Some(Coordinate::new(lat, lng)),
        leaving_early: false,
        early_departure_time: None,
        can_drive: true,
        available_seats: seats,
    }
}

/// Outbound event context (from the event toward homes) at the test venue.
pub fn outbound_event() -> EventContext {
    EventContext {
        coordinate: EVENT_COORDINATE,
        start_time: None,
        direction: TripDirection::FromEvent,
    }
}

/// Inbound event context (homes toward the event) starting at the given time.
pub fn inbound_event(start_time: DateTime<Utc>) -> EventContext {
    EventContext {
        coordinate: EVENT_COORDINATE,
        start_time: Some(start_time),
        direction: TripDirection::ToEvent,
    }
}
