use chrono::{Duration, Timelike};

use crate::context::{MatcherContext, EVENT_LOCATION_ID};
use crate::geo::travel_time_minutes;
use crate::people::{Driver, Passenger, TripDirection};

use super::matcher::{MatchDecision, Matcher};

/// Earliest reasonable pickup hour (UTC) for a morning event.
const MIN_PICKUP_HOUR_MORNING_EVENT: u32 = 5;
/// Earliest reasonable pickup hour (UTC) for an afternoon or evening event.
const MIN_PICKUP_HOUR_DAY_EVENT: u32 = 6;

/// Departure-time compatibility. Outbound it hard-partitions early leavers
/// from everyone else; inbound it sanity-checks how early the pickup would be.
#[derive(Debug, Default)]
pub struct TimingMatcher;

impl Matcher for TimingMatcher {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn priority(&self) -> u8 {
        0
    }

    fn evaluate(
        &self,
        passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        match ctx.direction {
            TripDirection::FromEvent => evaluate_outbound(passenger, driver),
            TripDirection::ToEvent => evaluate_inbound(passenger, ctx),
        }
    }
}

fn evaluate_outbound(passenger: &Passenger, driver: &Driver) -> MatchDecision {
    if passenger.leaving_early != driver.leaving_early {
        return MatchDecision::HardReject;
    }
    if passenger.leaving_early {
        // Driver not yet ready when the passenger must leave.
        if let (Some(passenger_leaves), Some(driver_leaves)) =
            (passenger.early_departure_time, driver.early_departure_time)
        {
            if passenger_leaves < driver_leaves {
                return MatchDecision::HardReject;
            }
        }
        return MatchDecision::Score(1.0);
    }
    MatchDecision::Score(0.5)
}

fn evaluate_inbound(passenger: &Passenger, ctx: &MatcherContext) -> MatchDecision {
    let Some(event_start) = ctx.event_start_time else {
        return MatchDecision::Score(0.5);
    };

    // Tentative pickup using the passenger's own home→event distance,
    // ignoring other stops. Unreachable homes are rejected by the route
    // efficiency matcher, so stay neutral here.
    let distance = ctx.matrix.distance(&passenger.id, EVENT_LOCATION_ID);
    if !distance.is_finite() {
        return MatchDecision::Score(0.5);
    }

    let travel = travel_time_minutes(distance, ctx.config.timing.traffic_buffer_multiplier);
    let lead_minutes = travel + ctx.config.timing.load_time_minutes;
    let pickup = event_start - Duration::milliseconds((lead_minutes * 60_000.0).round() as i64);

    let event_hour = event_start.hour();
    let pickup_hour = pickup.hour();
    let too_early = if event_hour < 12 {
        pickup_hour < MIN_PICKUP_HOUR_MORNING_EVENT
    } else {
        pickup_hour < MIN_PICKUP_HOUR_DAY_EVENT
    };
    if too_early {
        return MatchDecision::HardReject;
    }
    MatchDecision::Score(0.7)
}
