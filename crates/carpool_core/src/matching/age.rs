use crate::context::MatcherContext;
use crate::people::{Driver, Passenger};

use super::matcher::{MatchDecision, Matcher};

/// Age proximity. Pairs inside the configured age range score in [0.5, 1.0];
/// beyond it the score decays toward a 0.1 floor. Never rejects.
#[derive(Debug, Default)]
pub struct AgeMatcher;

impl Matcher for AgeMatcher {
    fn name(&self) -> &'static str {
        "age"
    }

    fn priority(&self) -> u8 {
        7
    }

    fn evaluate(
        &self,
        passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        let delta = passenger.age.abs_diff(driver.age) as f64;
        let range = ctx.config.group_by_age_range;
        let score = if range > 0.0 && delta <= range {
            1.0 - 0.5 * delta / range
        } else {
            (0.5 - (delta - range) / 50.0).max(0.1)
        };
        MatchDecision::Score(score)
    }
}
