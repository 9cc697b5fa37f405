//! Scoring aggregator: runs the hard-reject chain, coerces unavailable
//! scores, and folds the surviving matcher scores into one weighted total.

use crate::context::MatcherContext;
use crate::people::{Driver, Passenger, TripDirection};

use super::age::AgeMatcher;
use super::detour::DetourMatcher;
use super::driver_preference::DriverPreferenceMatcher;
use super::gender::GenderMatcher;
use super::matcher::{MatchDecision, Matcher};
use super::route_efficiency::RouteEfficiencyMatcher;
use super::timing::TimingMatcher;

/// Score a matcher falls back to when it has no opinion.
const NEUTRAL_SCORE: f64 = 0.5;

/// Outbound score for a detour matcher that could not price the detour.
const OUTBOUND_UNPRICED_DETOUR_SCORE: f64 = 0.1;

/// Which matcher hard-rejected a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedBy {
    Timing,
    RouteEfficiency,
    Gender,
    Detour,
}

/// Result of scoring one (passenger, driver) pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairEvaluation {
    Accepted { score: f64 },
    Rejected { by: RejectedBy },
}

impl PairEvaluation {
    pub fn accepted_score(&self) -> Option<f64> {
        match self {
            PairEvaluation::Accepted { score } => Some(*score),
            PairEvaluation::Rejected { .. } => None,
        }
    }
}

/// Evaluates the reject chain (timing, route efficiency, gender) and then the
/// weighted sum over route efficiency, detour, gender, age, and driver
/// preference. Ties on the total are broken downstream by preserving
/// passenger enumeration order.
pub fn evaluate_pair(
    passenger: &Passenger,
    driver: &Driver,
    ctx: &MatcherContext,
) -> PairEvaluation {
    if TimingMatcher.evaluate(passenger, driver, ctx) == MatchDecision::HardReject {
        return PairEvaluation::Rejected {
            by: RejectedBy::Timing,
        };
    }

    let route = match RouteEfficiencyMatcher.evaluate(passenger, driver, ctx) {
        MatchDecision::HardReject => {
            return PairEvaluation::Rejected {
                by: RejectedBy::RouteEfficiency,
            }
        }
        decision => decision.score_or(NEUTRAL_SCORE),
    };

    let gender = match GenderMatcher.evaluate(passenger, driver, ctx) {
        MatchDecision::HardReject => {
            return PairEvaluation::Rejected {
                by: RejectedBy::Gender,
            }
        }
        decision => decision.score_or(NEUTRAL_SCORE),
    };

    let detour = match DetourMatcher.evaluate(passenger, driver, ctx) {
        MatchDecision::Score(score) => score,
        MatchDecision::HardReject => {
            return PairEvaluation::Rejected {
                by: RejectedBy::Detour,
            }
        }
        MatchDecision::Unavailable => match ctx.direction {
            TripDirection::FromEvent => OUTBOUND_UNPRICED_DETOUR_SCORE,
            TripDirection::ToEvent => {
                return PairEvaluation::Rejected {
                    by: RejectedBy::Detour,
                }
            }
        },
    };

    let age = AgeMatcher
        .evaluate(passenger, driver, ctx)
        .score_or(NEUTRAL_SCORE);
    let preference = DriverPreferenceMatcher
        .evaluate(passenger, driver, ctx)
        .score_or(NEUTRAL_SCORE);

    let weights = &ctx.config.weights;
    let score = weights.route_efficiency * route
        + weights.detour * detour
        + weights.gender_match * gender
        + weights.age_match * age
        + weights.driver_preference * preference;

    PairEvaluation::Accepted { score }
}
