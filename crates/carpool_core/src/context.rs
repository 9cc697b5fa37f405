//! Per-run matching context: the pairwise distance matrix, per-driver direct
//! distances, and the mutable assignment ledger.
//!
//! The context is built once per matching call and owned exclusively by it.
//! The matrix and direct distances are immutable after construction; only the
//! assignment engine mutates the ledger. Matchers read the context but never
//! write it.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::config::MatchingConfig;
use crate::geo::{road_distance_miles, Coordinate};
use crate::people::{Driver, EventContext, Passenger, TripDirection};

/// Sentinel identifier for the event location inside the distance matrix.
pub const EVENT_LOCATION_ID: &str = "event";

/// Dense pairwise road-distance table over `{event} ∪ passengers ∪ drivers`.
///
/// Keyed by a dense integer index assigned at build time; entries involving a
/// location with no resolved coordinate are infinite, which downstream
/// matchers treat as an unreachable pairing.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    index: HashMap<String, usize>,
    miles: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn build(event: Coordinate, passengers: &[Passenger], drivers: &[Driver]) -> Self {
        let capacity = 1 + passengers.len() + drivers.len();
        let mut ids: Vec<&str> = Vec::with_capacity(capacity);
        let mut coords: Vec<Option<Coordinate>> = Vec::with_capacity(capacity);

        ids.push(EVENT_LOCATION_ID);
        coords.push(Some(event));
        for passenger in passengers {
            ids.push(&passenger.id);
            coords.push(passenger.home_coordinate);
        }
        for driver in drivers {
            ids.push(&driver.id);
            coords.push(driver.home_coordinate);
        }

        let n = ids.len();
        let mut miles = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                miles[i][j] = match (coords[i], coords[j]) {
                    (Some(from), Some(to)) => road_distance_miles(from, to),
                    _ => f64::INFINITY,
                };
            }
        }

        let index = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), i))
            .collect();

        Self { index, miles }
    }

    /// Road miles between two locations. Unknown identifiers are treated the
    /// same as missing coordinates.
    pub fn distance(&self, from: &str, to: &str) -> f64 {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&i), Some(&j)) => self.miles[i][j],
            _ => f64::INFINITY,
        }
    }

    pub fn len(&self) -> usize {
        self.miles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.miles.is_empty()
    }
}

/// All state one matching run needs: immutable distances and config plus the
/// mutable availability/assignment ledger.
#[derive(Debug)]
pub struct MatcherContext {
    pub matrix: DistanceMatrix,
    /// Driver's route length with no passengers: event→home for outbound,
    /// home→event for inbound.
    pub driver_direct_distance: HashMap<String, f64>,
    pub direction: TripDirection,
    pub event_start_time: Option<DateTime<Utc>>,
    pub config: MatchingConfig,
    pub available_passengers: HashSet<String>,
    pub available_seats: HashMap<String, u32>,
    /// Passengers assigned per driver, in assignment order.
    pub assignments: HashMap<String, Vec<String>>,
}

impl MatcherContext {
    /// Builds the context from already-filtered inputs: passengers who need a
    /// ride, drivers who can drive with at least one seat.
    pub fn build(
        passengers: &[Passenger],
        drivers: &[Driver],
        event: &EventContext,
        config: MatchingConfig,
    ) -> Self {
        let matrix = DistanceMatrix::build(event.coordinate, passengers, drivers);

        let driver_direct_distance = drivers
            .iter()
            .map(|driver| {
                let direct = match event.direction {
                    TripDirection::FromEvent => matrix.distance(EVENT_LOCATION_ID, &driver.id),
                    TripDirection::ToEvent => matrix.distance(&driver.id, EVENT_LOCATION_ID),
                };
                (driver.id.clone(), direct)
            })
            .collect();

        let available_passengers = passengers.iter().map(|p| p.id.clone()).collect();
        let available_seats = drivers
            .iter()
            .map(|d| (d.id.clone(), d.available_seats))
            .collect();
        let assignments = drivers.iter().map(|d| (d.id.clone(), Vec::new())).collect();

        Self {
            matrix,
            driver_direct_distance,
            direction: event.direction,
            event_start_time: event.start_time,
            config,
            available_passengers,
            available_seats,
            assignments,
        }
    }

    pub fn direct_distance(&self, driver_id: &str) -> f64 {
        self.driver_direct_distance
            .get(driver_id)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn remaining_seats(&self, driver_id: &str) -> u32 {
        self.available_seats.get(driver_id).copied().unwrap_or(0)
    }

    pub fn total_remaining_seats(&self) -> u32 {
        self.available_seats.values().sum()
    }

    pub fn assigned(&self, driver_id: &str) -> &[String] {
        self.assignments
            .get(driver_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_available(&self, passenger_id: &str) -> bool {
        self.available_passengers.contains(passenger_id)
    }

    /// Records an assignment: the passenger leaves the available pool, joins
    /// the driver's list, and consumes one seat.
    pub fn assign(&mut self, driver_id: &str, passenger_id: &str) {
        self.available_passengers.remove(passenger_id);
        if let Some(list) = self.assignments.get_mut(driver_id) {
            list.push(passenger_id.to_string());
        }
        if let Some(seats) = self.available_seats.get_mut(driver_id) {
            *seats = seats.saturating_sub(1);
        }
    }

    /// Route length for the driver through the given stops in order,
    /// including the terminal leg (outbound: event→stops→home, inbound:
    /// home→stops→event).
    pub fn route_distance(&self, driver_id: &str, ordered_stops: &[String]) -> f64 {
        let (origin, terminus) = match self.direction {
            TripDirection::FromEvent => (EVENT_LOCATION_ID, driver_id),
            TripDirection::ToEvent => (driver_id, EVENT_LOCATION_ID),
        };

        let mut total = 0.0;
        let mut previous = origin;
        for stop in ordered_stops {
            total += self.matrix.distance(previous, stop);
            previous = stop;
        }
        total + self.matrix.distance(previous, terminus)
    }

    /// Extra miles beyond the driver's direct route introduced by the stops.
    pub fn total_detour(&self, driver_id: &str, ordered_stops: &[String]) -> f64 {
        let route = self.route_distance(driver_id, ordered_stops);
        let direct = self.direct_distance(driver_id);
        if !route.is_finite() || !direct.is_finite() {
            return f64::INFINITY;
        }
        (route - direct).max(0.0)
    }
}
