pub mod age;
pub mod capacity;
pub mod detour;
pub mod driver_preference;
pub mod early_departure;
pub mod gender;
pub mod matcher;
pub mod route_efficiency;
pub mod score;
pub mod timing;

pub use age::AgeMatcher;
pub use capacity::CapacityMatcher;
pub use detour::DetourMatcher;
pub use driver_preference::DriverPreferenceMatcher;
pub use early_departure::EarlyDepartureMatcher;
pub use gender::GenderMatcher;
pub use matcher::{MatchDecision, Matcher};
pub use route_efficiency::RouteEfficiencyMatcher;
pub use score::{evaluate_pair, PairEvaluation, RejectedBy};
pub use timing::TimingMatcher;

/// Matcher names in priority order (lower priority number first).
pub const PRIORITY_ORDER: [&str; 8] = [
    "timing",
    "early_departure",
    "capacity",
    "route_efficiency",
    "driver_preference",
    "detour",
    "gender",
    "age",
];
