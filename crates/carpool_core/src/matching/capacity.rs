use crate::context::MatcherContext;
use crate::people::{Driver, Passenger};

use super::matcher::{MatchDecision, Matcher};

/// Seat availability. Rejects full cars and biases toward topping up
/// partially-full ones so passengers cluster into fewer vehicles.
#[derive(Debug, Default)]
pub struct CapacityMatcher;

impl Matcher for CapacityMatcher {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn evaluate(
        &self,
        _passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        let remaining = ctx.remaining_seats(&driver.id);
        if remaining == 0 {
            return MatchDecision::HardReject;
        }
        let total = driver.available_seats.max(1) as f64;
        let fill_ratio = (driver.available_seats.saturating_sub(remaining)) as f64 / total;
        MatchDecision::Score(0.5 + 0.5 * fill_ratio)
    }
}
