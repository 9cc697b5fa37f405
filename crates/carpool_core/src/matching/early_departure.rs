use crate::context::MatcherContext;
use crate::people::{Driver, Passenger, TripDirection};

use super::matcher::{MatchDecision, Matcher};

/// Early-departure affinity. Vestigial: its weight defaults to zero and the
/// timing matcher has already rejected mismatched pairs by the time it runs,
/// so the low mismatch score never decides an assignment.
#[derive(Debug, Default)]
pub struct EarlyDepartureMatcher;

impl Matcher for EarlyDepartureMatcher {
    fn name(&self) -> &'static str {
        "early_departure"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn evaluate(
        &self,
        passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        if ctx.direction == TripDirection::ToEvent {
            return MatchDecision::Score(0.5);
        }
        let score = match (passenger.leaving_early, driver.leaving_early) {
            (true, true) => 1.0,
            (false, false) => 0.5,
            _ => 0.1,
        };
        MatchDecision::Score(score)
    }
}
