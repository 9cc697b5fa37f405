use crate::context::MatcherContext;
use crate::people::{genders_align, Driver, GenderPreference, Passenger};

use super::matcher::{MatchDecision, Matcher};

/// Gender compatibility. An unmet same-gender preference is a hard reject
/// when enforcement is on, otherwise a strong soft penalty.
#[derive(Debug, Default)]
pub struct GenderMatcher;

impl Matcher for GenderMatcher {
    fn name(&self) -> &'static str {
        "gender"
    }

    fn priority(&self) -> u8 {
        6
    }

    fn evaluate(
        &self,
        passenger: &Passenger,
        driver: &Driver,
        ctx: &MatcherContext,
    ) -> MatchDecision {
        let aligned = genders_align(passenger.gender, driver.gender);
        if passenger.gender_preference == GenderPreference::SameGender && !aligned {
            if ctx.config.enforce_gender_preference {
                return MatchDecision::HardReject;
            }
            return MatchDecision::Score(0.2);
        }
        if aligned {
            MatchDecision::Score(1.0)
        } else {
            MatchDecision::Score(0.6)
        }
    }
}
