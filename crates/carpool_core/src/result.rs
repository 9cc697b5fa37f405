//! Output model: ride groups, unmatched passengers with their reason, and
//! run metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chrono::{DateTime, Utc};

use crate::geo::Coordinate;
use crate::people::{Driver, Passenger, TripDirection};
use crate::route::Waypoint;
use crate::schedule::GroupSchedule;

/// Version tag reported in metadata so stored results can be compared across
/// algorithm revisions.
pub const ALGORITHM_VERSION: &str = "phased-greedy/1";

/// One driver's car with its seated passengers in driving order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideGroup {
    pub id: Uuid,
    pub driver: Driver,
    pub ordered_passengers: Vec<Passenger>,
    pub direction: TripDirection,
    pub total_route_distance: f64,
    pub total_detour: f64,
    pub waypoints: Vec<Waypoint>,
    /// Present for inbound groups with at least one passenger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<GroupSchedule>,
}

/// Why a passenger could not be seated. Wire names are stable strings the
/// transport layer and stored results rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    NoAvailableDrivers,
    ExceedsDetourLimit,
    GenderPreferenceUnmet,
    NoSeatsAvailable,
    CheckedInTooLate,
    EarlyDepartureMismatch,
    CannotArriveOnTime,
}

impl UnmatchedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnmatchedReason::NoAvailableDrivers => "no_available_drivers",
            UnmatchedReason::ExceedsDetourLimit => "exceeds_detour_limit",
            UnmatchedReason::GenderPreferenceUnmet => "gender_preference_unmet",
            UnmatchedReason::NoSeatsAvailable => "no_seats_available",
            UnmatchedReason::CheckedInTooLate => "checked_in_too_late",
            UnmatchedReason::EarlyDepartureMismatch => "early_departure_mismatch",
            UnmatchedReason::CannotArriveOnTime => "cannot_arrive_on_time",
        }
    }

    /// Short human-readable next step, keyed by reason.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            UnmatchedReason::NoAvailableDrivers => {
                "Ask the organizer to recruit another driver, or arrange your own ride."
            }
            UnmatchedReason::ExceedsDetourLimit => {
                "Consider meeting a driver at a central pickup point closer to their route."
            }
            UnmatchedReason::GenderPreferenceUnmet => {
                "Relax the same-gender preference, or ask the organizer for a matching driver."
            }
            UnmatchedReason::NoSeatsAvailable => {
                "All cars are full. Ask the organizer whether another driver can join."
            }
            UnmatchedReason::CheckedInTooLate => {
                "Check in before matching runs so a seat can be held for you."
            }
            UnmatchedReason::EarlyDepartureMismatch => {
                "No driver is leaving early. Stay until the event ends or arrange your own ride."
            }
            UnmatchedReason::CannotArriveOnTime => {
                "The pickup would be unreasonably early. Consider arriving separately."
            }
        }
    }
}

/// A passenger the run could not seat, with the reason and a suggested step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedPassenger {
    #[serde(flatten)]
    pub passenger: Passenger,
    pub reason: UnmatchedReason,
    pub suggested_action: String,
}

impl UnmatchedPassenger {
    pub fn new(passenger: Passenger, reason: UnmatchedReason) -> Self {
        Self {
            passenger,
            reason,
            suggested_action: reason.suggested_action().to_string(),
        }
    }
}

/// Run statistics attached to every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub total_passengers: usize,
    pub total_drivers: usize,
    pub matched_passengers: usize,
    pub matched_drivers: usize,
    pub matching_duration_ms: u64,
    pub algorithm_version: String,
    pub priority_order: Vec<String>,
    pub trip_direction: TripDirection,
}

/// Everything one matching call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResult {
    pub id: Uuid,
    pub trip_direction: TripDirection,
    pub start_location: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_start_time: Option<DateTime<Utc>>,
    pub ride_groups: Vec<RideGroup>,
    pub unmatched_passengers: Vec<UnmatchedPassenger>,
    pub unmatched_drivers: Vec<Driver>,
    pub metadata: MatchMetadata,
}
