//! Collaborator seams for the surrounding transport layer: address
//! resolution and result persistence.
//!
//! The core never calls these itself. Geocoding happens before a matching
//! call (the engine consumes resolved coordinates and computes its own
//! distances), and results are written after one.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::geo::Coordinate;
use crate::result::MatchingResult;

/// A resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

/// Errors from a geocoding provider.
#[derive(Debug)]
pub enum GeocodeError {
    /// The provider could not resolve the input.
    NotFound,
    /// The provider failed with its own message.
    Provider(String),
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeError::NotFound => write!(f, "address could not be resolved"),
            GeocodeError::Provider(message) => write!(f, "geocoding provider error: {message}"),
        }
    }
}

impl std::error::Error for GeocodeError {}

/// Address resolution, implemented by the transport layer against a real
/// provider.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError>;
    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<GeocodedAddress, GeocodeError>;
}

/// Append-only sink for finished matching results, keyed by result id.
pub trait ResultsStore: Send + Sync {
    fn put(&self, result: MatchingResult);
    fn get(&self, id: &Uuid) -> Option<MatchingResult>;
}

/// In-memory results store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryResultsStore {
    results: Mutex<HashMap<Uuid, MatchingResult>>,
}

impl MemoryResultsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultsStore for MemoryResultsStore {
    fn put(&self, result: MatchingResult) {
        if let Ok(mut results) = self.results.lock() {
            results.insert(result.id, result);
        }
    }

    fn get(&self, id: &Uuid) -> Option<MatchingResult> {
        match self.results.lock() {
            Ok(results) => results.get(id).cloned(),
            Err(_) => None,
        }
    }
}
