//! Domain types: passengers, drivers, and the event being travelled to or from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
}

/// A passenger's requirement on the driver's gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPreference {
    SameGender,
    #[default]
    Any,
}

/// Direction of the trip relative to the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripDirection {
    /// From homes to the event. Route origin is the driver's home.
    #[serde(rename = "TO_EVENT")]
    ToEvent,
    /// From the event to homes. Route origin is the event.
    #[serde(rename = "FROM_EVENT")]
    FromEvent,
}

impl TripDirection {
    pub fn is_to_event(&self) -> bool {
        matches!(self, TripDirection::ToEvent)
    }
}

/// Someone who needs a seat in a carpool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    /// Resolved home location; absent when geocoding failed upstream.
    pub home_coordinate: Option<Coordinate>,
    #[serde(default)]
    pub leaving_early: bool,
    #[serde(default)]
    pub early_departure_time: Option<DateTime<Utc>>,
    pub needs_ride: bool,
    #[serde(default)]
    pub gender_preference: GenderPreference,
}

/// Someone offering seats in their car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    /// Resolved home location; absent when geocoding failed upstream.
    pub home_coordinate: Option<Coordinate>,
    #[serde(default)]
    pub leaving_early: bool,
    #[serde(default)]
    pub early_departure_time: Option<DateTime<Utc>>,
    pub can_drive: bool,
    pub available_seats: u32,
}

/// The event the trip is toward or away from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub coordinate: Coordinate,
    /// Required for trips to the event; the timing planner works backward
    /// from it.
    pub start_time: Option<DateTime<Utc>>,
    pub direction: TripDirection,
}

/// True when the pair's genders are compatible in the same-gender sense:
/// equal, or either side declined to state one.
pub fn genders_align(a: Gender, b: Gender) -> bool {
    a == Gender::PreferNotToSay || b == Gender::PreferNotToSay || a == b
}
