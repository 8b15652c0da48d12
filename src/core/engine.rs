use tracing::debug;

use super::error::InputError;
use super::trajectory::{lump_sum_trajectory, monthly_trajectory, no_spend_trajectory};
use super::types::{
    FeasibilityResult, MONTHS_PER_YEAR, ScenarioInput, ScenarioReport, TimeUnit, Withdrawal,
};

pub fn no_spend_final(capital: f64, annual_rate: f64, years: u32) -> f64 {
    capital * growth_factor(annual_rate, years)
}

pub fn monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0
}

pub fn earliest_lump_sum_year(
    capital: f64,
    annual_rate: f64,
    target: f64,
    years: u32,
    amount: f64,
) -> FeasibilityResult {
    let baseline = no_spend_final(capital, annual_rate, years);
    if baseline < target {
        return FeasibilityResult::not_found(baseline);
    }

    // Ascending scan; the first hit is the earliest year.
    for spend_year in 0..=years {
        let final_amount = lump_sum_final(capital, annual_rate, years, amount, spend_year);
        if final_amount >= target {
            return FeasibilityResult::found(spend_year, final_amount);
        }
    }

    FeasibilityResult::not_found(baseline)
}

pub fn earliest_monthly_spend(
    capital: f64,
    annual_rate: f64,
    target: f64,
    years: u32,
    amount: f64,
) -> FeasibilityResult {
    let baseline = no_spend_final(capital, annual_rate, years);
    if baseline < target {
        return FeasibilityResult::not_found(baseline);
    }

    // No month index exists past u32::MAX months, so there is no candidate to report.
    let Some(total_months) = years.checked_mul(MONTHS_PER_YEAR) else {
        return FeasibilityResult::not_found(baseline);
    };
    let rate = monthly_rate(annual_rate);
    for start_month in 0..=total_months {
        let Some(final_amount) =
            monthly_candidate_final(capital, rate, total_months, amount, start_month)
        else {
            continue;
        };
        if final_amount >= target {
            return FeasibilityResult::found(start_month, final_amount);
        }
    }

    FeasibilityResult::not_found(baseline)
}

/// A `spend_year` past the horizon is taken at the horizon.
pub fn lump_sum_final(
    capital: f64,
    annual_rate: f64,
    years: u32,
    amount: f64,
    spend_year: u32,
) -> f64 {
    let spend_year = spend_year.min(years);
    let grown = capital * growth_factor(annual_rate, spend_year);
    (grown - amount) * growth_factor(annual_rate, years - spend_year)
}

pub fn monthly_candidate_final(
    capital: f64,
    monthly_rate: f64,
    total_months: u32,
    amount: f64,
    start_month: u32,
) -> Option<f64> {
    let mut capital = capital;
    for _ in 0..start_month {
        capital *= 1.0 + monthly_rate;
    }

    for _ in start_month..total_months {
        capital -= amount;
        if capital < 0.0 {
            return None;
        }
        capital *= 1.0 + monthly_rate;
    }
    Some(capital)
}

pub fn run_scenario(input: &ScenarioInput) -> Result<ScenarioReport, InputError> {
    input.validate()?;

    let ScenarioInput {
        capital,
        annual_rate,
        target,
        years,
        withdrawal,
    } = *input;
    let no_spend_final = no_spend_final(capital, annual_rate, years);

    let (result, with_spend, no_spend) = match withdrawal {
        Withdrawal::LumpSum { amount } => {
            let result = earliest_lump_sum_year(capital, annual_rate, target, years, amount);
            let with_spend = result
                .when_index
                .map(|year| lump_sum_trajectory(capital, annual_rate, years, amount, year));
            let no_spend = no_spend_trajectory(capital, annual_rate, years, TimeUnit::Year);
            (result, with_spend, no_spend)
        }
        Withdrawal::Monthly { amount } => {
            let result = earliest_monthly_spend(capital, annual_rate, target, years, amount);
            let with_spend = result
                .when_index
                .map(|month| monthly_trajectory(capital, annual_rate, years, amount, month));
            let no_spend = no_spend_trajectory(capital, annual_rate, years, TimeUnit::Month);
            (result, with_spend, no_spend)
        }
    };

    debug!(
        mode = ?withdrawal.kind(),
        found = result.is_found(),
        when_index = ?result.when_index,
        final_amount = result.final_amount,
        "scenario evaluated"
    );

    Ok(ScenarioReport {
        input: *input,
        result,
        no_spend_final,
        with_spend,
        no_spend,
    })
}

fn growth_factor(annual_rate: f64, years: u32) -> f64 {
    let base = 1.0 + annual_rate;
    match i32::try_from(years) {
        Ok(n) => base.powi(n),
        Err(_) => base.powf(f64::from(years)),
    }
}
