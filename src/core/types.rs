use serde::Serialize;

use super::engine::no_spend_final;
use super::error::InputError;

pub const MAX_YEARS: u32 = 500;
pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithdrawalKind {
    LumpSum,
    Monthly,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Withdrawal {
    LumpSum { amount: f64 },
    Monthly { amount: f64 },
}

impl Withdrawal {
    pub fn kind(self) -> WithdrawalKind {
        match self {
            Withdrawal::LumpSum { .. } => WithdrawalKind::LumpSum,
            Withdrawal::Monthly { .. } => WithdrawalKind::Monthly,
        }
    }

    pub fn amount(self) -> f64 {
        match self {
            Withdrawal::LumpSum { amount } | Withdrawal::Monthly { amount } => amount,
        }
    }
}

/// `annual_rate` is a fraction (0.09 for 9 %).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScenarioInput {
    pub capital: f64,
    pub annual_rate: f64,
    pub target: f64,
    pub years: u32,
    pub withdrawal: Withdrawal,
}

impl ScenarioInput {
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("capital", self.capital),
            ("target", self.target),
            ("withdrawal amount", self.withdrawal.amount()),
        ] {
            if !value.is_finite() {
                return Err(InputError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(InputError::Negative { field });
            }
        }

        if !self.annual_rate.is_finite() {
            return Err(InputError::NotFinite {
                field: "annual rate",
            });
        }
        if self.annual_rate <= -1.0 || self.annual_rate > 1.0 {
            return Err(InputError::RateOutOfRange {
                rate: self.annual_rate,
            });
        }

        if self.years > MAX_YEARS {
            return Err(InputError::HorizonTooLong {
                years: self.years,
                max: MAX_YEARS,
            });
        }

        let withdrawn = match self.withdrawal {
            Withdrawal::LumpSum { amount } => amount,
            Withdrawal::Monthly { amount } => amount * f64::from(self.years * MONTHS_PER_YEAR),
        };
        if !no_spend_final(self.capital + withdrawn, self.annual_rate, self.years).is_finite() {
            return Err(InputError::Overflow);
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResult {
    pub when_index: Option<u32>,
    pub final_amount: f64,
}

impl FeasibilityResult {
    pub fn found(when_index: u32, final_amount: f64) -> Self {
        Self {
            when_index: Some(when_index),
            final_amount,
        }
    }

    pub fn not_found(no_spend_final: f64) -> Self {
        Self {
            when_index: None,
            final_amount: no_spend_final,
        }
    }

    pub fn is_found(&self) -> bool {
        self.when_index.is_some()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub index: u32,
    pub capital: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub unit: TimeUnit,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn last_capital(&self) -> Option<f64> {
        self.points.last().map(|p| p.capital)
    }
}

// 27 -> year 2, month 3
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MonthOffset {
    pub years: u32,
    pub months: u32,
}

impl MonthOffset {
    pub fn from_index(month_index: u32) -> Self {
        Self {
            years: month_index / MONTHS_PER_YEAR,
            months: month_index % MONTHS_PER_YEAR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScenarioReport {
    pub input: ScenarioInput,
    pub result: FeasibilityResult,
    pub no_spend_final: f64,
    pub with_spend: Option<Trajectory>,
    pub no_spend: Trajectory,
}
