//! Matching configuration: weights, limits, and timing knobs, with
//! partial-override merging for per-request tuning.

use serde::{Deserialize, Serialize};

use crate::matching::PRIORITY_ORDER;

pub const DEFAULT_MAX_DETOUR_MILES: f64 = 5.0;
pub const DEFAULT_GROUP_BY_AGE_RANGE: f64 = 10.0;
pub const DEFAULT_TRAFFIC_BUFFER_MULTIPLIER: f64 = 1.3;
pub const DEFAULT_LOAD_TIME_MINUTES: f64 = 3.0;

/// Persisted weight sets must sum to 1.0 within this tolerance.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Per-matcher weights for the aggregate score. Each weight is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherWeights {
    pub route_efficiency: f64,
    pub detour: f64,
    pub gender_match: f64,
    pub age_match: f64,
    pub driver_preference: f64,
    /// Weight zero: early-departure compatibility is enforced as a hard
    /// timing constraint, not scored.
    pub early_departure: f64,
}

impl Default for MatcherWeights {
    fn default() -> Self {
        Self {
            route_efficiency: 0.30,
            detour: 0.30,
            gender_match: 0.20,
            age_match: 0.15,
            driver_preference: 0.05,
            early_departure: 0.0,
        }
    }
}

impl MatcherWeights {
    pub fn sum(&self) -> f64 {
        self.route_efficiency
            + self.detour
            + self.gender_match
            + self.age_match
            + self.driver_preference
            + self.early_departure
    }
}

/// Travel-time model knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingConfig {
    /// Multiplier applied to free-flow travel time.
    pub traffic_buffer_multiplier: f64,
    /// Minutes spent loading at each stop.
    pub load_time_minutes: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            traffic_buffer_multiplier: DEFAULT_TRAFFIC_BUFFER_MULTIPLIER,
            load_time_minutes: DEFAULT_LOAD_TIME_MINUTES,
        }
    }
}

/// Effective configuration for one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingConfig {
    /// Soft scoring knob for outbound trips, hard cap for inbound trips.
    pub max_detour_miles: f64,
    /// When true, an unmet same-gender preference is a hard reject instead
    /// of a soft penalty.
    pub enforce_gender_preference: bool,
    /// Age difference (years) considered "same group" for full age score.
    pub group_by_age_range: f64,
    pub timing: TimingConfig,
    pub weights: MatcherWeights,
    /// Matcher names in evaluation priority order. Reported in result
    /// metadata; replaced wholesale by overrides.
    pub priority_order: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_detour_miles: DEFAULT_MAX_DETOUR_MILES,
            enforce_gender_preference: false,
            group_by_age_range: DEFAULT_GROUP_BY_AGE_RANGE,
            timing: TimingConfig::default(),
            weights: MatcherWeights::default(),
            priority_order: PRIORITY_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MatchingConfig {
    /// Validation applied when a configuration is persisted. Per-call
    /// overrides are not re-validated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_detour_miles <= 0.0 {
            return Err(ConfigError::NonPositive("maxDetourMiles"));
        }
        if self.group_by_age_range <= 0.0 {
            return Err(ConfigError::NonPositive("groupByAgeRange"));
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }

    /// Merges a partial override into this configuration: weight fields
    /// merge field-wise, `priority_order` replaces wholesale, everything
    /// else replaces wholesale.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(miles) = overrides.max_detour_miles {
            self.max_detour_miles = miles;
        }
        if let Some(enforce) = overrides.enforce_gender_preference {
            self.enforce_gender_preference = enforce;
        }
        if let Some(range) = overrides.group_by_age_range {
            self.group_by_age_range = range;
        }
        if let Some(timing) = overrides.timing {
            self.timing = timing;
        }
        if let Some(weights) = &overrides.weights {
            weights.merge_into(&mut self.weights);
        }
        if let Some(order) = &overrides.priority_order {
            self.priority_order = order.clone();
        }
        self
    }
}

/// Field-wise partial override for [`MatcherWeights`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightOverrides {
    pub route_efficiency: Option<f64>,
    pub detour: Option<f64>,
    pub gender_match: Option<f64>,
    pub age_match: Option<f64>,
    pub driver_preference: Option<f64>,
    pub early_departure: Option<f64>,
}

impl WeightOverrides {
    fn merge_into(&self, weights: &mut MatcherWeights) {
        if let Some(w) = self.route_efficiency {
            weights.route_efficiency = w;
        }
        if let Some(w) = self.detour {
            weights.detour = w;
        }
        if let Some(w) = self.gender_match {
            weights.gender_match = w;
        }
        if let Some(w) = self.age_match {
            weights.age_match = w;
        }
        if let Some(w) = self.driver_preference {
            weights.driver_preference = w;
        }
        if let Some(w) = self.early_departure {
            weights.early_departure = w;
        }
    }
}

/// Partial configuration supplied with a matching request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub max_detour_miles: Option<f64>,
    pub enforce_gender_preference: Option<bool>,
    pub group_by_age_range: Option<f64>,
    pub timing: Option<TimingConfig>,
    pub weights: Option<WeightOverrides>,
    pub priority_order: Option<Vec<String>>,
}

/// Errors from persisting an invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Named field must be strictly positive.
    NonPositive(&'static str),
    /// Weights must sum to ~1.0; carries the observed sum.
    WeightSum(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive(field) => {
                write!(f, "{field} must be greater than zero")
            }
            ConfigError::WeightSum(sum) => {
                write!(f, "matcher weights must sum to 1.0 (got {sum:.3})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
