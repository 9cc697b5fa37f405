use crate::context::{MatcherContext, EVENT_LOCATION_ID};
use crate::people::{Driver, Passenger, TripDirection};

use super::matcher::{MatchDecision, Matcher};

/// How much of the detoured route is useful driving. Compares the driver's
/// direct distance `D` against the single-stop route `R` through the
/// passenger; efficiency `D / R` maps to a score where 1.0 means the
/// passenger is on the way and 0 means the route at least doubles.
#[derive(Debug, Default)]
pub struct RouteEfficiencyMatcher;

impl Matcher for RouteEfficiencyMatcher {
    fn name(&self) -> &'static str {
        "route_efficiency"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn evaluate(
        &self,
        passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        let direct = ctx.direct_distance(&driver.id);
        let through = match ctx.direction {
            TripDirection::FromEvent => {
                ctx.matrix.distance(EVENT_LOCATION_ID, &passenger.id)
                    + ctx.matrix.distance(&passenger.id, &driver.id)
            }
            TripDirection::ToEvent => {
                ctx.matrix.distance(&driver.id, &passenger.id)
                    + ctx.matrix.distance(&passenger.id, EVENT_LOCATION_ID)
            }
        };

        if !direct.is_finite() || !through.is_finite() {
            return MatchDecision::HardReject;
        }
        if ctx.direction == TripDirection::ToEvent
            && through - direct > ctx.config.max_detour_miles
        {
            return MatchDecision::HardReject;
        }
        if through <= 0.0 {
            // Everyone at the same point; nothing to lose by pairing.
            return MatchDecision::Score(1.0);
        }

        let efficiency = direct / through;
        MatchDecision::Score(((efficiency - 0.5) * 2.0).clamp(0.0, 1.0))
    }
}
