//! The matching operation: validates the request, filters inputs, builds the
//! context, runs assignment, optimizes each car's stop order, plans inbound
//! timing, and classifies whoever is left without a seat.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use chrono::{DateTime, Utc};

use crate::assignment::run_assignment;
use crate::config::{ConfigOverrides, MatchingConfig};
use crate::context::MatcherContext;
use crate::geo::Coordinate;
use crate::matching::{evaluate_pair, PairEvaluation, RejectedBy};
use crate::people::{
    genders_align, Driver, EventContext, GenderPreference, Passenger, TripDirection,
};
use crate::result::{
    MatchMetadata, MatchingResult, RideGroup, UnmatchedPassenger, UnmatchedReason,
    ALGORITHM_VERSION,
};
use crate::route::optimize_stop_order;
use crate::schedule::plan_group_schedule;

/// One matching call's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub passengers: Vec<Passenger>,
    pub drivers: Vec<Driver>,
    pub event_location: Coordinate,
    pub direction: TripDirection,
    #[serde(default)]
    pub event_start_time: Option<DateTime<Utc>>,
    /// Accepted for interface completeness; outbound departures are driven by
    /// individual early-departure times rather than the event end.
    #[serde(default)]
    pub event_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config_overrides: Option<ConfigOverrides>,
}

/// Errors surfaced by the matching operation. Infeasibility is not an error;
/// it shows up as unmatched passengers in a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    Validation(String),
}

impl MatchingError {
    /// Stable wire name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchingError::Validation(_) => "validation_error",
        }
    }
}

impl std::fmt::Display for MatchingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingError::Validation(message) => write!(f, "validation error: {message}"),
        }
    }
}

impl std::error::Error for MatchingError {}

/// Matches passengers to drivers for one trip.
///
/// Fails fast on an invalid request; otherwise always succeeds, reporting
/// passengers it could not seat in `unmatched_passengers` with a reason and
/// suggested action. Identical inputs and config produce identical outputs
/// apart from generated ids.
pub fn match_rides(request: &MatchRequest) -> Result<MatchingResult, MatchingError> {
    let started = Instant::now();

    if request.direction.is_to_event() && request.event_start_time.is_none() {
        return Err(MatchingError::Validation(
            "eventStartTime is required for trips to the event".to_string(),
        ));
    }
    validate_coordinates(request)?;

    let config = match &request.config_overrides {
        Some(overrides) => MatchingConfig::default().with_overrides(overrides),
        None => MatchingConfig::default(),
    };

    let riders: Vec<Passenger> = request
        .passengers
        .iter()
        .filter(|p| p.needs_ride)
        .cloned()
        .collect();
    let fleet: Vec<Driver> = request
        .drivers
        .iter()
        .filter(|d| d.can_drive && d.available_seats > 0)
        .cloned()
        .collect();

    debug!(
        riders = riders.len(),
        fleet = fleet.len(),
        direction = ?request.direction,
        "matching run starting"
    );

    if riders.is_empty() {
        return Ok(empty_result(request, &config, fleet, started));
    }

    let event = EventContext {
        coordinate: request.event_location,
        start_time: request.event_start_time,
        direction: request.direction,
    };
    let mut ctx = MatcherContext::build(&riders, &fleet, &event, config);
    run_assignment(&riders, &fleet, &mut ctx);

    let passenger_by_id: HashMap<&str, &Passenger> =
        riders.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut ride_groups = Vec::with_capacity(fleet.len());
    let mut matched_passengers = 0;
    for driver in &fleet {
        let assigned = ctx.assigned(&driver.id).to_vec();
        let route = optimize_stop_order(&ctx, &driver.id, &assigned);

        let ordered_passengers: Vec<Passenger> = route
            .ordered_passenger_ids
            .iter()
            .filter_map(|id| passenger_by_id.get(id.as_str()).map(|p| (*p).clone()))
            .collect();
        matched_passengers += ordered_passengers.len();

        let schedule = match (request.direction, request.event_start_time) {
            (TripDirection::ToEvent, Some(start)) if !route.ordered_passenger_ids.is_empty() => {
                Some(plan_group_schedule(
                    &ctx,
                    &driver.id,
                    &route.ordered_passenger_ids,
                    start,
                ))
            }
            _ => None,
        };

        ride_groups.push(RideGroup {
            id: Uuid::new_v4(),
            driver: driver.clone(),
            ordered_passengers,
            direction: request.direction,
            total_route_distance: route.total_route_distance,
            total_detour: route.total_detour,
            waypoints: route.waypoints,
            schedule,
        });
    }

    let unmatched_passengers: Vec<UnmatchedPassenger> = riders
        .iter()
        .filter(|p| ctx.is_available(&p.id))
        .map(|p| UnmatchedPassenger::new(p.clone(), classify_unmatched(p, &fleet, &ctx)))
        .collect();

    let unmatched_drivers: Vec<Driver> = fleet
        .iter()
        .filter(|d| ctx.assigned(&d.id).is_empty())
        .cloned()
        .collect();
    let matched_drivers = fleet.len() - unmatched_drivers.len();

    let metadata = MatchMetadata {
        total_passengers: riders.len(),
        total_drivers: fleet.len(),
        matched_passengers,
        matched_drivers,
        matching_duration_ms: started.elapsed().as_millis() as u64,
        algorithm_version: ALGORITHM_VERSION.to_string(),
        priority_order: ctx.config.priority_order.clone(),
        trip_direction: request.direction,
    };

    info!(
        matched_passengers,
        unmatched = unmatched_passengers.len(),
        matched_drivers,
        duration_ms = metadata.matching_duration_ms,
        "matching run complete"
    );

    Ok(MatchingResult {
        id: Uuid::new_v4(),
        trip_direction: request.direction,
        start_location: request.event_location,
        event_start_time: request.event_start_time,
        ride_groups,
        unmatched_passengers,
        unmatched_drivers,
        metadata,
    })
}

/// Rejects requests whose coordinates fall outside the valid degree ranges.
/// Absent home coordinates are allowed; they surface downstream as
/// infeasibility, not as an invalid request.
fn validate_coordinates(request: &MatchRequest) -> Result<(), MatchingError> {
    if !request.event_location.is_valid() {
        return Err(MatchingError::Validation(
            "eventLocation is outside the valid coordinate range".to_string(),
        ));
    }
    for passenger in &request.passengers {
        if let Some(home) = passenger.home_coordinate {
            if !home.is_valid() {
                return Err(MatchingError::Validation(format!(
                    "passenger {} has an out-of-range home coordinate",
                    passenger.id
                )));
            }
        }
    }
    for driver in &request.drivers {
        if let Some(home) = driver.home_coordinate {
            if !home.is_valid() {
                return Err(MatchingError::Validation(format!(
                    "driver {} has an out-of-range home coordinate",
                    driver.id
                )));
            }
        }
    }
    Ok(())
}

/// Result for a run with no passengers needing rides.
fn empty_result(
    request: &MatchRequest,
    config: &MatchingConfig,
    fleet: Vec<Driver>,
    started: Instant,
) -> MatchingResult {
    let total_drivers = fleet.len();
    MatchingResult {
        id: Uuid::new_v4(),
        trip_direction: request.direction,
        start_location: request.event_location,
        event_start_time: request.event_start_time,
        ride_groups: Vec::new(),
        unmatched_passengers: Vec::new(),
        unmatched_drivers: fleet,
        metadata: MatchMetadata {
            total_passengers: 0,
            total_drivers,
            matched_passengers: 0,
            matched_drivers: 0,
            matching_duration_ms: started.elapsed().as_millis() as u64,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            priority_order: config.priority_order.clone(),
            trip_direction: request.direction,
        },
    }
}

/// Picks the reason reported for a passenger left without a seat.
fn classify_unmatched(
    passenger: &Passenger,
    fleet: &[Driver],
    ctx: &MatcherContext,
) -> UnmatchedReason {
    if ctx.direction == TripDirection::FromEvent
        && passenger.leaving_early
        && !fleet.iter().any(|d| d.leaving_early)
    {
        return UnmatchedReason::EarlyDepartureMismatch;
    }

    if ctx.direction == TripDirection::ToEvent
        && !fleet.is_empty()
        && fleet.iter().all(|d| {
            matches!(
                evaluate_pair(passenger, d, ctx),
                PairEvaluation::Rejected {
                    by: RejectedBy::Timing
                }
            )
        })
    {
        return UnmatchedReason::CannotArriveOnTime;
    }

    if !fleet.is_empty() && ctx.total_remaining_seats() == 0 {
        return UnmatchedReason::NoSeatsAvailable;
    }

    if !fleet.is_empty()
        && ctx.config.enforce_gender_preference
        && passenger.gender_preference == GenderPreference::SameGender
        && !fleet
            .iter()
            .any(|d| genders_align(passenger.gender, d.gender) && ctx.remaining_seats(&d.id) > 0)
    {
        return UnmatchedReason::GenderPreferenceUnmet;
    }

    UnmatchedReason::NoAvailableDrivers
}

#[cfg(test)]
mod tests;
