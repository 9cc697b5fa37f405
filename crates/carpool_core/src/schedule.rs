//! Inbound timing planner: works backward from the event start to produce
//! per-passenger ready-by times, the driver's departure time, and the group
//! schedule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{MatcherContext, EVENT_LOCATION_ID};
use crate::geo::travel_time_minutes;

/// Slack between planned departure math and reality.
pub const DEPARTURE_SAFETY_BUFFER_MINUTES: f64 = 10.0;

/// Target arrival ahead of the event start.
pub const ARRIVAL_BUFFER_MINUTES: f64 = 5.0;

/// When a passenger must be ready at their door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerPickup {
    pub passenger_id: String,
    pub should_be_ready_by: DateTime<Utc>,
}

/// Timing for one inbound ride group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSchedule {
    pub driver_departure_time: DateTime<Utc>,
    pub pickups: Vec<PassengerPickup>,
    pub estimated_arrival_time: DateTime<Utc>,
}

/// Plans the schedule for an inbound group with at least one passenger, in
/// pickup order.
pub fn plan_group_schedule(
    ctx: &MatcherContext,
    driver_id: &str,
    ordered: &[String],
    event_start: DateTime<Utc>,
) -> GroupSchedule {
    let buffer = ctx.config.timing.traffic_buffer_multiplier;
    let load_minutes = ctx.config.timing.load_time_minutes;
    let stop_count = ordered.len();

    let pickups = ordered
        .iter()
        .enumerate()
        .map(|(position, passenger_id)| {
            // Remaining driving distance: this passenger through all later
            // stops to the event.
            let mut distance = 0.0;
            let mut previous = passenger_id.as_str();
            for later in &ordered[position + 1..] {
                distance += ctx.matrix.distance(previous, later);
                previous = later;
            }
            distance += ctx.matrix.distance(previous, EVENT_LOCATION_ID);

            let travel = travel_time_minutes(distance, buffer);
            let load_buffer = (stop_count - 1 - position) as f64 * load_minutes;
            PassengerPickup {
                passenger_id: passenger_id.clone(),
                should_be_ready_by: minutes_before(event_start, travel + load_buffer),
            }
        })
        .collect();

    let total_route = ctx.route_distance(driver_id, ordered);
    let driving_minutes = travel_time_minutes(total_route, buffer);
    let departure_lead =
        driving_minutes + stop_count as f64 * load_minutes + DEPARTURE_SAFETY_BUFFER_MINUTES;

    GroupSchedule {
        driver_departure_time: minutes_before(event_start, departure_lead),
        pickups,
        estimated_arrival_time: minutes_before(event_start, ARRIVAL_BUFFER_MINUTES),
    }
}

fn minutes_before(instant: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    if !minutes.is_finite() {
        return instant;
    }
    instant - Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use crate::test_helpers::{driver, inbound_event, passenger, utc};

    fn build_ctx(
        passengers: &[crate::people::Passenger],
        drivers: &[crate::people::Driver],
        start: DateTime<Utc>,
    ) -> MatcherContext {
        MatcherContext::build(
            passengers,
            drivers,
            &inbound_event(start),
            MatchingConfig::default(),
        )
    }

    #[test]
    fn single_passenger_schedule_is_ordered_before_event() {
        let start = utc(2026, 6, 6, 9, 0);
        let passengers = vec![passenger("p1", 37.78, -122.42)];
        let drivers = vec![driver("d1", 37.79, -122.43, 3)];
        let ctx = build_ctx(&passengers, &drivers, start);

        let schedule = plan_group_schedule(&ctx, "d1", &["p1".to_string()], start);

        assert_eq!(schedule.pickups.len(), 1);
        assert!(schedule.pickups[0].should_be_ready_by < start);
        assert!(schedule.driver_departure_time < start);
        assert!(schedule.estimated_arrival_time <= start);
        // Departure covers the leg to the passenger plus load and safety
        // buffers, so it precedes the passenger's ready-by time.
        assert!(schedule.driver_departure_time < schedule.pickups[0].should_be_ready_by);
    }

    #[test]
    fn last_pickup_has_no_load_buffer_for_others() {
        let start = utc(2026, 6, 6, 9, 0);
        let passengers = vec![
            passenger("near", 37.786, -122.428),
            passenger("mid", 37.78, -122.42),
        ];
        let drivers = vec![driver("d1", 37.79, -122.43, 3)];
        let ctx = build_ctx(&passengers, &drivers, start);

        let ordered = vec!["near".to_string(), "mid".to_string()];
        let schedule = plan_group_schedule(&ctx, "d1", &ordered, start);

        // Earlier stops must be ready sooner than later stops.
        assert!(
            schedule.pickups[0].should_be_ready_by < schedule.pickups[1].should_be_ready_by,
            "first pickup should be ready before the second"
        );
    }

    #[test]
    fn coincident_passenger_is_ready_at_event_start() {
        let start = utc(2026, 6, 6, 9, 0);
        // Passenger lives at the venue.
        let passengers = vec![passenger("p1", 37.7749, -122.4194)];
        let drivers = vec![driver("d1", 37.79, -122.43, 3)];
        let ctx = build_ctx(&passengers, &drivers, start);

        let schedule = plan_group_schedule(&ctx, "d1", &["p1".to_string()], start);
        assert_eq!(schedule.pickups[0].should_be_ready_by, start);
    }

    #[test]
    fn arrival_is_five_minutes_before_start() {
        let start = utc(2026, 6, 6, 9, 0);
        let passengers = vec![passenger("p1", 37.78, -122.42)];
        let drivers = vec![driver("d1", 37.79, -122.43, 3)];
        let ctx = build_ctx(&passengers, &drivers, start);

        let schedule = plan_group_schedule(&ctx, "d1", &["p1".to_string()], start);
        assert_eq!(start - schedule.estimated_arrival_time, Duration::minutes(5));
    }
}
