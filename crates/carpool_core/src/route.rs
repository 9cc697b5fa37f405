//! Stop-order optimization: greedy nearest neighbor from the route origin.
//!
//! Good enough stop ordering for a handful of passengers per car; globally
//! optimal routing is a non-goal.

use serde::{Deserialize, Serialize};

use crate::context::MatcherContext;
use crate::people::TripDirection;

/// One stop on an optimized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub passenger_id: String,
    /// 1-based position in driving order.
    pub stop_order: u32,
    /// Set for outbound trips, mirrors `stop_order`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_off_order: Option<u32>,
    /// Set for inbound trips, mirrors `stop_order`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_order: Option<u32>,
    /// Miles added by this stop: the leg from the previous stop.
    pub detour_added: f64,
    /// Cumulative miles from the route origin.
    pub distance_from_origin: f64,
}

/// A driver's route after stop-order optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedRoute {
    /// Passenger ids in driving order.
    pub ordered_passenger_ids: Vec<String>,
    pub waypoints: Vec<Waypoint>,
    /// Full route length including the terminal leg.
    pub total_route_distance: f64,
    /// Extra miles beyond the driver's direct route.
    pub total_detour: f64,
}

/// Reorders the driver's assigned passengers by greedy nearest neighbor from
/// the route origin (the event for outbound trips, the driver's home for
/// inbound) and computes per-leg distances. Ties keep assignment order.
pub fn optimize_stop_order(
    ctx: &MatcherContext,
    driver_id: &str,
    assigned: &[String],
) -> OptimizedRoute {
    let origin = match ctx.direction {
        TripDirection::FromEvent => crate::context::EVENT_LOCATION_ID,
        TripDirection::ToEvent => driver_id,
    };

    let mut remaining: Vec<&String> = assigned.iter().collect();
    let mut ordered: Vec<String> = Vec::with_capacity(assigned.len());
    let mut waypoints: Vec<Waypoint> = Vec::with_capacity(assigned.len());
    let mut current = origin.to_string();
    let mut cumulative = 0.0;

    while !remaining.is_empty() {
        let mut nearest_index = 0;
        let mut nearest_distance = f64::INFINITY;
        for (index, candidate) in remaining.iter().enumerate() {
            let distance = ctx.matrix.distance(&current, candidate);
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest_index = index;
            }
        }

        let stop = remaining.remove(nearest_index).clone();
        let leg = if nearest_distance.is_finite() {
            nearest_distance
        } else {
            0.0
        };
        cumulative += leg;

        let stop_order = ordered.len() as u32 + 1;
        waypoints.push(Waypoint {
            passenger_id: stop.clone(),
            stop_order,
            drop_off_order: match ctx.direction {
                TripDirection::FromEvent => Some(stop_order),
                TripDirection::ToEvent => None,
            },
            pickup_order: match ctx.direction {
                TripDirection::ToEvent => Some(stop_order),
                TripDirection::FromEvent => None,
            },
            detour_added: leg,
            distance_from_origin: cumulative,
        });
        current = stop.clone();
        ordered.push(stop);
    }

    let total_route_distance = ctx.route_distance(driver_id, &ordered);
    let total_detour = ctx.total_detour(driver_id, &ordered);

    OptimizedRoute {
        ordered_passenger_ids: ordered,
        waypoints,
        total_route_distance: if total_route_distance.is_finite() {
            total_route_distance
        } else {
            0.0
        },
        total_detour: if total_detour.is_finite() {
            total_detour
        } else {
            0.0
        },
    }
}
