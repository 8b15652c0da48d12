use super::engine::monthly_rate;
use super::types::{MONTHS_PER_YEAR, TimeUnit, Trajectory, TrajectoryPoint};

pub fn no_spend_trajectory(
    capital: f64,
    annual_rate: f64,
    years: u32,
    unit: TimeUnit,
) -> Trajectory {
    let (steps, step_rate) = match unit {
        TimeUnit::Year => (years, annual_rate),
        TimeUnit::Month => (month_count(years), monthly_rate(annual_rate)),
    };

    let mut points = Vec::with_capacity(steps as usize + 1);
    let mut current = capital;
    points.push(TrajectoryPoint {
        index: 0,
        capital: current,
    });
    for index in 1..=steps {
        current *= 1.0 + step_rate;
        points.push(TrajectoryPoint {
            index,
            capital: current,
        });
    }

    Trajectory { unit, points }
}

/// Point 0 is always the opening balance. Every later point is the year-end balance after any
/// withdrawal due that year, so a year-0 withdrawal first shows at point 1. With `years > 0` the
/// last point matches [`lump_sum_final`](super::engine::lump_sum_final); with `years == 0` the
/// only point is the opening balance. A `spend_year` past the horizon is taken at the horizon.
pub fn lump_sum_trajectory(
    capital: f64,
    annual_rate: f64,
    years: u32,
    amount: f64,
    spend_year: u32,
) -> Trajectory {
    let spend_year = spend_year.min(years);
    let mut points = Vec::with_capacity(years as usize + 1);
    let mut current = capital;
    points.push(TrajectoryPoint {
        index: 0,
        capital: current,
    });
    if spend_year == 0 {
        current -= amount;
    }

    for year in 1..=years {
        current *= 1.0 + annual_rate;
        if year == spend_year {
            current -= amount;
        }
        points.push(TrajectoryPoint {
            index: year,
            capital: current,
        });
    }

    Trajectory {
        unit: TimeUnit::Year,
        points,
    }
}

/// Capital at the start of each month. From `start_month` on, `amount` is taken before that
/// month's growth. Capital may go negative and keeps compounding.
pub fn monthly_trajectory(
    capital: f64,
    annual_rate: f64,
    years: u32,
    amount: f64,
    start_month: u32,
) -> Trajectory {
    let rate = monthly_rate(annual_rate);
    let total_months = month_count(years);

    let mut points = Vec::with_capacity(total_months as usize + 1);
    let mut current = capital;
    for month in 0..=total_months {
        points.push(TrajectoryPoint {
            index: month,
            capital: current,
        });

        if month < total_months {
            if month >= start_month {
                current -= amount;
            }
            current *= 1.0 + rate;
        }
    }

    Trajectory {
        unit: TimeUnit::Month,
        points,
    }
}

// Month indices are u32; a horizon past u32::MAX months keeps only the opening point.
fn month_count(years: u32) -> u32 {
    years.checked_mul(MONTHS_PER_YEAR).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{earliest_lump_sum_year, lump_sum_final, no_spend_final};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn assert_close(actual: f64, expected: f64) {
        let tol = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn capitals(trajectory: &Trajectory) -> Vec<f64> {
        trajectory.points.iter().map(|p| p.capital).collect()
    }

    #[test]
    fn no_spend_yearly_compounds_each_year() {
        let trajectory = no_spend_trajectory(1_000.0, 0.10, 3, TimeUnit::Year);
        assert_eq!(trajectory.unit, TimeUnit::Year);
        let values = capitals(&trajectory);
        assert_eq!(values.len(), 4);
        assert_close(values[0], 1_000.0);
        assert_close(values[1], 1_100.0);
        assert_close(values[2], 1_210.0);
        assert_close(values[3], 1_331.0);
    }

    #[test]
    fn no_spend_monthly_ends_on_annual_baseline() {
        let trajectory = no_spend_trajectory(20_000.0, 0.09, 30, TimeUnit::Month);
        assert_eq!(trajectory.points.len(), 361);
        assert_eq!(trajectory.points[360].index, 360);
        assert!(
            (trajectory.last_capital().expect("non-empty") - no_spend_final(20_000.0, 0.09, 30))
                .abs()
                < 1e-6
        );
    }

    #[test]
    fn zero_year_trajectories_hold_only_the_opening_balance() {
        for unit in [TimeUnit::Year, TimeUnit::Month] {
            let trajectory = no_spend_trajectory(500.0, 0.05, 0, unit);
            assert_eq!(capitals(&trajectory), vec![500.0]);
        }
        assert_eq!(
            capitals(&monthly_trajectory(500.0, 0.05, 0, 10.0, 0)),
            vec![500.0]
        );
        // The year-0 withdrawal is in the search result (490), not in the single point.
        assert_eq!(
            capitals(&lump_sum_trajectory(500.0, 0.05, 0, 10.0, 0)),
            vec![500.0]
        );
        assert_close(lump_sum_final(500.0, 0.05, 0, 10.0, 0), 490.0);
    }

    #[test]
    fn lump_sum_withdrawal_past_horizon_lands_on_last_year() {
        let values = capitals(&lump_sum_trajectory(1_000.0, 0.10, 2, 100.0, 9));
        assert_eq!(values.len(), 3);
        assert_close(values[2], 1_110.0);
        assert_close(values[2], lump_sum_final(1_000.0, 0.10, 2, 100.0, 9));
    }

    #[test]
    fn monthly_paths_with_unrepresentable_month_count_keep_opening_point() {
        let no_spend = no_spend_trajectory(1.0, 0.0, 400_000_000, TimeUnit::Month);
        assert_eq!(capitals(&no_spend), vec![1.0]);
        let spend = monthly_trajectory(1.0, 0.0, 400_000_000, 1.0, 0);
        assert_eq!(capitals(&spend), vec![1.0]);
    }

    #[test]
    fn lump_sum_withdrawal_lands_on_spend_year() {
        let values = capitals(&lump_sum_trajectory(1_000.0, 0.10, 3, 100.0, 2));
        assert_close(values[0], 1_000.0);
        assert_close(values[1], 1_100.0);
        assert_close(values[2], 1_110.0);
        assert_close(values[3], 1_221.0);
    }

    #[test]
    fn lump_sum_withdrawal_at_year_zero_shows_from_first_year() {
        let values = capitals(&lump_sum_trajectory(1_000.0, 0.10, 2, 100.0, 0));
        assert_close(values[0], 1_000.0);
        assert_close(values[1], 990.0);
        assert_close(values[2], 1_089.0);
    }

    #[test]
    fn lump_sum_path_ends_on_search_result() {
        let result = earliest_lump_sum_year(10_000.0, 0.30, 1_800_000.0, 20, 3_000.0);
        let year = result.when_index.expect("feasible");
        let trajectory = lump_sum_trajectory(10_000.0, 0.30, 20, 3_000.0, year);
        assert_close(trajectory.last_capital().expect("non-empty"), result.final_amount);
    }

    #[test]
    fn monthly_path_keeps_compounding_below_zero() {
        let trajectory = monthly_trajectory(100.0, 0.0, 1, 50.0, 0);
        let values = capitals(&trajectory);
        assert_eq!(values.len(), 13);
        assert_close(values[0], 100.0);
        assert_close(values[1], 50.0);
        assert_close(values[2], 0.0);
        assert_close(values[3], -50.0);
        assert_close(values[12], -500.0);
    }

    #[test]
    fn monthly_path_records_balance_before_withdrawal() {
        let values = capitals(&monthly_trajectory(1_000.0, 0.0, 1, 10.0, 11));
        assert_close(values[11], 1_000.0);
        assert_close(values[12], 990.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_trajectory_lengths_and_opening_balance(
            capital in 0u32..1_000_000,
            rate_bp in 0u32..3_000,
            years in 0u32..40,
            amount in 0u32..10_000,
            spend_offset in 0u32..1_000
        ) {
            let capital = capital as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let amount = amount as f64;
            let total_months = years * MONTHS_PER_YEAR;

            let yearly = no_spend_trajectory(capital, rate, years, TimeUnit::Year);
            prop_assert_eq!(yearly.points.len(), years as usize + 1);
            prop_assert_eq!(yearly.points[0].capital, capital);

            let monthly = no_spend_trajectory(capital, rate, years, TimeUnit::Month);
            prop_assert_eq!(monthly.points.len(), total_months as usize + 1);
            prop_assert_eq!(monthly.points[0].capital, capital);

            let spend_year = spend_offset % (years + 1);
            let lump = lump_sum_trajectory(capital, rate, years, amount, spend_year);
            prop_assert_eq!(lump.points.len(), years as usize + 1);
            prop_assert_eq!(lump.points[0].capital, capital);
            if years > 0 {
                let expected = lump_sum_final(capital, rate, years, amount, spend_year);
                let scale = no_spend_final(capital + amount, rate, years).max(1.0);
                let last = lump.last_capital().unwrap_or(f64::NAN);
                prop_assert!((last - expected).abs() <= 1e-9 * scale);
            }

            let start_month = spend_offset % (total_months + 1);
            let spend = monthly_trajectory(capital, rate, years, amount, start_month);
            prop_assert_eq!(spend.points.len(), total_months as usize + 1);
            prop_assert_eq!(spend.points[0].capital, capital);
            for (i, point) in spend.points.iter().enumerate() {
                prop_assert_eq!(point.index as usize, i);
            }
        }
    }
}
