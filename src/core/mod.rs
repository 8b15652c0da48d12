mod engine;
mod error;
mod trajectory;
mod types;

pub use engine::{
    earliest_lump_sum_year, earliest_monthly_spend, lump_sum_final, monthly_candidate_final,
    monthly_rate, no_spend_final, run_scenario,
};
pub use error::InputError;
pub use trajectory::{lump_sum_trajectory, monthly_trajectory, no_spend_trajectory};
pub use types::{
    FeasibilityResult, MAX_YEARS, MONTHS_PER_YEAR, MonthOffset, ScenarioInput, ScenarioReport,
    TimeUnit, Trajectory, TrajectoryPoint, Withdrawal, WithdrawalKind,
};
