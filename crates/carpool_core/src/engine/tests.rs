//! End-to-end matching scenarios.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::result::UnmatchedReason;
use crate::test_helpers::{driver, passenger, utc, EVENT_COORDINATE};

fn outbound_request(passengers: Vec<Passenger>, drivers: Vec<Driver>) -> MatchRequest {
    MatchRequest {
        passengers,
        drivers,
        event_location: EVENT_COORDINATE,
        direction: TripDirection::FromEvent,
        event_start_time: None,
        event_end_time: None,
        config_overrides: None,
    }
}

fn inbound_request(
    passengers: Vec<Passenger>,
    drivers: Vec<Driver>,
    start: chrono::DateTime<Utc>,
) -> MatchRequest {
    MatchRequest {
        passengers,
        drivers,
        event_location: EVENT_COORDINATE,
        direction: TripDirection::ToEvent,
        event_start_time: Some(start),
        event_end_time: None,
        config_overrides: None,
    }
}

#[test]
fn single_pair_outbound_matches() {
    let request = outbound_request(
        vec![passenger("p1", 37.78, -122.42)],
        vec![driver("d1", 37.79, -122.43, 3)],
    );
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.ride_groups.len(), 1);
    assert_eq!(result.ride_groups[0].ordered_passengers.len(), 1);
    assert_eq!(result.ride_groups[0].ordered_passengers[0].id, "p1");
    assert!(result.unmatched_passengers.is_empty());
    assert_eq!(result.metadata.matched_passengers, 1);
    assert_eq!(result.metadata.matched_drivers, 1);
}

#[test]
fn capacity_caps_group_size() {
    let passengers: Vec<Passenger> = (0..5)
        .map(|i| passenger(&format!("p{i}"), 37.78 + 0.001 * i as f64, -122.42))
        .collect();
    let request = outbound_request(passengers, vec![driver("d1", 37.79, -122.43, 3)]);
    let result = match_rides(&request).expect("match succeeds");

    assert!(result.ride_groups[0].ordered_passengers.len() <= 3);
    assert_eq!(result.unmatched_passengers.len(), 2);
    for unmatched in &result.unmatched_passengers {
        assert_eq!(unmatched.reason, UnmatchedReason::NoSeatsAvailable);
    }
}

#[test]
fn stop_orders_are_sequential() {
    let passengers = vec![
        passenger("a", 37.78, -122.42),
        passenger("b", 37.785, -122.425),
        passenger("c", 37.79, -122.43),
    ];
    let request = outbound_request(passengers, vec![driver("d1", 37.80, -122.44, 4)]);
    let result = match_rides(&request).expect("match succeeds");

    let group = &result.ride_groups[0];
    let orders: Vec<u32> = group.waypoints.iter().map(|w| w.stop_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert!(group.waypoints.iter().all(|w| w.drop_off_order == Some(w.stop_order)));
    assert!(group.waypoints.iter().all(|w| w.pickup_order.is_none()));
}

#[test]
fn early_leaver_without_early_driver_is_unmatched() {
    let mut early = passenger("a", 37.78, -122.42);
    early.leaving_early = true;
    let normal = passenger("b", 37.781, -122.421);
    let request = outbound_request(vec![early, normal], vec![driver("d1", 37.79, -122.43, 3)]);
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.ride_groups[0].ordered_passengers.len(), 1);
    assert_eq!(result.ride_groups[0].ordered_passengers[0].id, "b");
    assert_eq!(result.unmatched_passengers.len(), 1);
    assert_eq!(result.unmatched_passengers[0].passenger.id, "a");
    assert_eq!(
        result.unmatched_passengers[0].reason,
        UnmatchedReason::EarlyDepartureMismatch
    );
}

#[test]
fn everyone_gets_a_ride_when_seats_allow() {
    let request = outbound_request(
        vec![
            passenger("far", 37.9, -122.6),
            passenger("near", 37.78, -122.42),
        ],
        vec![driver("d1", 37.79, -122.43, 3)],
    );
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.ride_groups.len(), 1);
    assert_eq!(result.ride_groups[0].ordered_passengers.len(), 2);
    assert!(result.unmatched_passengers.is_empty());
}

#[test]
fn furthest_driver_gets_the_passenger() {
    let request = outbound_request(
        vec![passenger("p1", 37.79, -122.35)],
        vec![
            driver("close", 37.7750, -122.4195, 3),
            driver("far", 37.8044, -122.2712, 3),
        ],
    );
    let result = match_rides(&request).expect("match succeeds");

    let far_group = result
        .ride_groups
        .iter()
        .find(|g| g.driver.id == "far")
        .expect("far driver group");
    assert_eq!(far_group.ordered_passengers.len(), 1);

    // The close driver still appears, as an empty group and as unmatched.
    let close_group = result
        .ride_groups
        .iter()
        .find(|g| g.driver.id == "close")
        .expect("close driver group");
    assert!(close_group.ordered_passengers.is_empty());
    assert_eq!(result.unmatched_drivers.len(), 1);
    assert_eq!(result.unmatched_drivers[0].id, "close");
}

#[test]
fn inbound_schedule_is_fully_populated() {
    let start = utc(2026, 6, 6, 9, 0);
    let request = inbound_request(
        vec![passenger("p1", 37.78, -122.42)],
        vec![driver("d1", 37.79, -122.43, 3)],
        start,
    );
    let result = match_rides(&request).expect("match succeeds");

    let group = &result.ride_groups[0];
    assert_eq!(group.ordered_passengers.len(), 1);
    let schedule = group.schedule.as_ref().expect("inbound schedule");

    assert_eq!(schedule.pickups.len(), 1);
    assert!(schedule.pickups[0].should_be_ready_by < start);
    assert!(schedule.driver_departure_time < start);
    assert!(schedule.estimated_arrival_time <= start);
    assert!(group.waypoints.iter().all(|w| w.pickup_order.is_some()));
}

#[test]
fn inbound_without_start_time_is_a_validation_error() {
    let request = MatchRequest {
        event_start_time: None,
        ..inbound_request(
            vec![passenger("p1", 37.78, -122.42)],
            vec![driver("d1", 37.79, -122.43, 3)],
            utc(2026, 6, 6, 9, 0),
        )
    };
    let error = match_rides(&request).expect_err("missing start time must fail");
    assert_eq!(error.kind(), "validation_error");
}

#[test]
fn every_rider_lands_exactly_once() {
    let mut no_home = passenger("lost", 0.0, 0.0);
    no_home.home_coordinate = None;
    let passengers = vec![
        passenger("p1", 37.78, -122.42),
        passenger("p2", 37.76, -122.44),
        passenger("p3", 37.80, -122.41),
        no_home,
        passenger("p5", 37.77, -122.43),
    ];
    let drivers = vec![
        driver("d1", 37.79, -122.43, 2),
        driver("d2", 37.75, -122.45, 2),
    ];
    let request = outbound_request(passengers.clone(), drivers);
    let result = match_rides(&request).expect("match succeeds");

    for p in &passengers {
        let seated = result
            .ride_groups
            .iter()
            .flat_map(|g| &g.ordered_passengers)
            .filter(|seated| seated.id == p.id)
            .count();
        let unmatched = result
            .unmatched_passengers
            .iter()
            .filter(|u| u.passenger.id == p.id)
            .count();
        assert_eq!(seated + unmatched, 1, "{} must appear exactly once", p.id);
    }
    // A geocoding failure surfaces as infeasibility, not an error.
    assert!(result
        .unmatched_passengers
        .iter()
        .any(|u| u.passenger.id == "lost"));
}

#[test]
fn inputs_are_filtered_before_counting() {
    let mut walker = passenger("walker", 37.78, -122.42);
    walker.needs_ride = false;
    let mut resting = driver("resting", 37.79, -122.43, 3);
    resting.can_drive = false;
    let mut seatless = driver("seatless", 37.79, -122.43, 3);
    seatless.available_seats = 0;

    let request = outbound_request(
        vec![walker, passenger("p1", 37.78, -122.42)],
        vec![resting, seatless, driver("d1", 37.79, -122.43, 3)],
    );
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.metadata.total_passengers, 1);
    assert_eq!(result.metadata.total_drivers, 1);
    assert_eq!(result.ride_groups.len(), 1);
}

#[test]
fn zero_passengers_yields_empty_groups() {
    let request = outbound_request(vec![], vec![driver("d1", 37.79, -122.43, 3)]);
    let result = match_rides(&request).expect("match succeeds");

    assert!(result.ride_groups.is_empty());
    assert_eq!(result.unmatched_drivers.len(), 1);
    assert_eq!(result.metadata.total_passengers, 0);
    assert_eq!(result.metadata.matched_passengers, 0);
}

#[test]
fn zero_drivers_leaves_everyone_unmatched() {
    let mut early = passenger("early", 37.78, -122.42);
    early.leaving_early = true;
    let request = outbound_request(vec![passenger("p1", 37.78, -122.42), early], vec![]);
    let result = match_rides(&request).expect("match succeeds");

    assert!(result.ride_groups.is_empty());
    assert_eq!(result.unmatched_passengers.len(), 2);
    assert_eq!(
        result.unmatched_passengers[0].reason,
        UnmatchedReason::NoAvailableDrivers
    );
    assert_eq!(
        result.unmatched_passengers[1].reason,
        UnmatchedReason::EarlyDepartureMismatch
    );
}

#[test]
fn zero_drivers_wins_over_gender_preference_reason() {
    let mut p = passenger("p1", 37.78, -122.42);
    p.gender_preference = GenderPreference::SameGender;
    let mut request = outbound_request(vec![p], vec![]);
    request.config_overrides = Some(ConfigOverrides {
        enforce_gender_preference: Some(true),
        ..ConfigOverrides::default()
    });
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.unmatched_passengers.len(), 1);
    assert_eq!(
        result.unmatched_passengers[0].reason,
        UnmatchedReason::NoAvailableDrivers
    );
}

#[test]
fn out_of_range_coordinates_are_a_validation_error() {
    let mut skewed = passenger("p1", 37.78, -122.42);
    skewed.home_coordinate = Some(Coordinate::new(91.0, -122.42));
    let request = outbound_request(vec![skewed], vec![driver("d1", 37.79, -122.43, 3)]);
    let error = match_rides(&request).expect_err("out-of-range latitude must fail");
    assert_eq!(error.kind(), "validation_error");

    let mut request = outbound_request(
        vec![passenger("p1", 37.78, -122.42)],
        vec![driver("d1", 37.79, -122.43, 3)],
    );
    request.event_location = Coordinate::new(0.0, 200.0);
    let error = match_rides(&request).expect_err("out-of-range event location must fail");
    assert_eq!(error.kind(), "validation_error");
}

#[test]
fn inbound_groups_respect_the_detour_cap() {
    let passengers = vec![
        passenger("p1", 37.78, -122.42),
        passenger("p2", 37.77, -122.44),
        passenger("p3", 37.80, -122.40),
        passenger("p4", 37.76, -122.41),
    ];
    let drivers = vec![
        driver("d1", 37.79, -122.43, 2),
        driver("d2", 37.75, -122.45, 2),
    ];
    let result = match_rides(&inbound_request(passengers, drivers, utc(2026, 6, 6, 17, 0)))
        .expect("match succeeds");

    for group in &result.ride_groups {
        assert!(
            group.total_detour <= 5.0 + 1e-9,
            "group for {} exceeds the detour cap: {}",
            group.driver.id,
            group.total_detour
        );
    }
}

#[test]
fn enforced_gender_preference_surfaces_as_reason() {
    let mut p = passenger("p1", 37.78, -122.42);
    p.gender_preference = GenderPreference::SameGender;
    let mut d = driver("d1", 37.79, -122.43, 3);
    d.gender = crate::people::Gender::Male;

    let mut request = outbound_request(vec![p], vec![d]);
    request.config_overrides = Some(ConfigOverrides {
        enforce_gender_preference: Some(true),
        ..ConfigOverrides::default()
    });
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.unmatched_passengers.len(), 1);
    assert_eq!(
        result.unmatched_passengers[0].reason,
        UnmatchedReason::GenderPreferenceUnmet
    );
}

#[test]
fn impossible_inbound_pickup_reports_cannot_arrive_on_time() {
    // Event at 06:00 UTC; the passenger's pickup would land around 03:00,
    // which the timing matcher rejects for every driver.
    let request = inbound_request(
        vec![passenger("remote", 39.1, -122.42)],
        vec![driver("d1", 37.776, -122.42, 3)],
        utc(2026, 6, 6, 6, 0),
    );
    let result = match_rides(&request).expect("match succeeds");

    assert_eq!(result.unmatched_passengers.len(), 1);
    assert_eq!(
        result.unmatched_passengers[0].reason,
        UnmatchedReason::CannotArriveOnTime
    );
}

#[test]
fn identical_inputs_produce_identical_assignments() {
    fn population(seed: u64) -> (Vec<Passenger>, Vec<Driver>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let passengers = (0..20)
            .map(|i| {
                passenger(
                    &format!("p{i}"),
                    rng.gen_range(37.70..37.85),
                    rng.gen_range(-122.50..-122.35),
                )
            })
            .collect();
        let drivers = (0..4)
            .map(|i| {
                driver(
                    &format!("d{i}"),
                    rng.gen_range(37.70..37.85),
                    rng.gen_range(-122.50..-122.35),
                    rng.gen_range(1..5),
                )
            })
            .collect();
        (passengers, drivers)
    }

    fn shape(result: &MatchingResult) -> (Vec<(String, Vec<String>)>, Vec<String>) {
        let groups = result
            .ride_groups
            .iter()
            .map(|g| {
                (
                    g.driver.id.clone(),
                    g.ordered_passengers.iter().map(|p| p.id.clone()).collect(),
                )
            })
            .collect();
        let unmatched = result
            .unmatched_passengers
            .iter()
            .map(|u| u.passenger.id.clone())
            .collect();
        (groups, unmatched)
    }

    let (passengers, drivers) = population(7);
    let request = outbound_request(passengers, drivers);
    let first = match_rides(&request).expect("first run");
    let second = match_rides(&request).expect("second run");

    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn result_serializes_with_wire_field_names() {
    let request = outbound_request(
        vec![passenger("p1", 37.78, -122.42)],
        vec![driver("d1", 37.79, -122.43, 3)],
    );
    let result = match_rides(&request).expect("match succeeds");
    let json = serde_json::to_value(&result).expect("serialize result");

    assert!(json.get("rideGroups").is_some());
    assert!(json.get("unmatchedPassengers").is_some());
    assert_eq!(json["tripDirection"], "FROM_EVENT");
    assert_eq!(json["metadata"]["algorithmVersion"], ALGORITHM_VERSION);
    let group = &json["rideGroups"][0];
    assert!(group.get("totalRouteDistance").is_some());
    assert!(group["waypoints"][0].get("dropOffOrder").is_some());
}
