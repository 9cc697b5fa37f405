//! Geographic primitives: straight-line and road-distance estimation plus the
//! tiered speed model used for travel-time estimates.
//!
//! Road distance is approximated as haversine distance times a fixed road
//! factor. Travel time picks an average speed by leg length: short hops move
//! at surface-street speeds, long legs at highway speeds.

use serde::{Deserialize, Serialize};

/// Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Multiplier applied to straight-line distance to approximate road distance.
pub const ROAD_DISTANCE_FACTOR: f64 = 1.4;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are inside their valid degree ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance between two coordinates in miles.
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lng1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lng2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlng = (dlng * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Estimated road distance in miles between two coordinates.
pub fn road_distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    haversine_miles(a, b) * ROAD_DISTANCE_FACTOR
}

/// Average speed in mph for a leg of the given length.
///
/// Under 5 miles assumes surface streets (20 mph), under 15 miles arterial
/// roads (35 mph), and 15 miles or more highway driving (55 mph).
pub fn dynamic_speed_mph(distance_miles: f64) -> f64 {
    if distance_miles < 5.0 {
        20.0
    } else if distance_miles < 15.0 {
        35.0
    } else {
        55.0
    }
}

/// Estimated travel time in minutes for a leg, including the traffic buffer.
pub fn travel_time_minutes(distance_miles: f64, traffic_buffer_multiplier: f64) -> f64 {
    if distance_miles <= 0.0 {
        return 0.0;
    }
    (distance_miles / dynamic_speed_mph(distance_miles)) * 60.0 * traffic_buffer_multiplier
}
