use crate::context::MatcherContext;
use crate::people::{Driver, Passenger};

use super::matcher::{MatchDecision, Matcher};

/// Reserved for driver-declared passenger preferences. Until those exist it
/// contributes a neutral score.
#[derive(Debug, Default)]
pub struct DriverPreferenceMatcher;

impl Matcher for DriverPreferenceMatcher {
    fn name(&self) -> &'static str {
        "driver_preference"
    }

    fn priority(&self) -> u8 {
        4
    }

    fn evaluate(
        &self,
        _passenger: &Passenger,
        _driver: &Driver,
        _ctx: &MatcherContext,
    ) -> MatchDecision {
        MatchDecision::Score(0.5)
    }
}
