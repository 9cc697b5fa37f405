use crate::context::MatcherContext;
use crate::people::{Driver, Passenger, TripDirection};

use super::matcher::{MatchDecision, Matcher};

/// Incremental detour cost of appending the passenger to the driver's current
/// route. Inbound the total detour is additionally capped hard at
/// `maxDetourMiles`; outbound the limit only shapes the score.
#[derive(Debug, Default)]
pub struct DetourMatcher;

impl Matcher for DetourMatcher {
    fn name(&self) -> &'static str {
        "detour"
    }

    fn priority(&self) -> u8 {
        5
    }

    fn evaluate(
        &self,
        passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        let current = ctx.assigned(&driver.id);
        let mut extended = current.to_vec();
        extended.push(passenger.id.clone());

        let base_route = ctx.route_distance(&driver.id, current);
        let extended_route = ctx.route_distance(&driver.id, &extended);
        let direct = ctx.direct_distance(&driver.id);
        if !base_route.is_finite() || !extended_route.is_finite() || !direct.is_finite() {
            return MatchDecision::Unavailable;
        }

        let total_detour = (extended_route - direct).max(0.0);
        if ctx.direction == TripDirection::ToEvent && total_detour > ctx.config.max_detour_miles {
            return MatchDecision::HardReject;
        }

        let incremental = (extended_route - base_route).max(0.0);
        MatchDecision::Score((1.0 - incremental / ctx.config.max_detour_miles).clamp(0.0, 1.0))
    }
}
