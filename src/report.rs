use std::fmt::Write as _;

use serde::Serialize;

use crate::core::{
    MonthOffset, ScenarioReport, TimeUnit, TrajectoryPoint, Withdrawal, WithdrawalKind,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub mode: WithdrawalKind,
    pub found: bool,
    pub when_index: Option<u32>,
    pub when_year: Option<u32>,
    pub when_month: Option<u32>,
    pub final_amount: f64,
    pub no_spend_final: f64,
    pub unit: TimeUnit,
    pub with_spend: Option<Vec<TrajectoryPoint>>,
    pub no_spend: Vec<TrajectoryPoint>,
    pub summary: String,
}

pub fn build_calculate_response(report: &ScenarioReport) -> CalculateResponse {
    let (when_year, when_month) = match (report.input.withdrawal, report.result.when_index) {
        (Withdrawal::LumpSum { .. }, Some(year)) => (Some(year), None),
        (Withdrawal::Monthly { .. }, Some(month)) => {
            let offset = MonthOffset::from_index(month);
            (Some(offset.years), Some(offset.months))
        }
        (_, None) => (None, None),
    };

    CalculateResponse {
        mode: report.input.withdrawal.kind(),
        found: report.result.is_found(),
        when_index: report.result.when_index,
        when_year,
        when_month,
        final_amount: report.result.final_amount,
        no_spend_final: report.no_spend_final,
        unit: report.no_spend.unit,
        with_spend: report.with_spend.as_ref().map(|t| t.points.clone()),
        no_spend: report.no_spend.points.clone(),
        summary: summary(report),
    }
}

pub fn summary(report: &ScenarioReport) -> String {
    let input = &report.input;
    let target = input.target;
    let years = input.years;

    match (input.withdrawal, report.result.when_index) {
        (Withdrawal::LumpSum { amount }, Some(year)) => format!(
            "Possible!\n\
             You can spend {amount:.2} at year {year} (or later) and still reach {target:.2} by year {years}.\n\
             Final amount: {:.2}\n\
             Without spending, you'd have {:.2}.",
            report.result.final_amount, report.no_spend_final
        ),
        (Withdrawal::Monthly { amount }, Some(month)) => {
            let offset = MonthOffset::from_index(month);
            format!(
                "Possible!\n\
                 You can start spending {amount:.2} monthly from year {}, month {}, and still reach {target:.2} by year {years}.\n\
                 Final amount: {:.2}\n\
                 Without spending, you'd have {:.2}.",
                offset.years, offset.months, report.result.final_amount, report.no_spend_final
            )
        }
        (Withdrawal::LumpSum { amount }, None) => format!(
            "It's not possible to spend {amount:.2} and still reach the goal.\n\
             Without spending, you'd have {:.2} by year {years}.",
            report.no_spend_final
        ),
        (Withdrawal::Monthly { amount }, None) => format!(
            "It's not possible to spend {amount:.2} monthly and still reach the goal.\n\
             Without spending, you'd have {:.2} by year {years}.",
            report.no_spend_final
        ),
    }
}

pub fn trajectory_table(report: &ScenarioReport) -> String {
    let header = match report.no_spend.unit {
        TimeUnit::Year => "Year",
        TimeUnit::Month => "Month",
    };

    let mut out = String::new();
    let _ = writeln!(out, "{header:>6}  {:>18}  {:>18}", "With spending", "No spending");
    for (idx, point) in report.no_spend.points.iter().enumerate() {
        let with_spend = report
            .with_spend
            .as_ref()
            .and_then(|t| t.points.get(idx))
            .map_or_else(|| "-".to_string(), |p| format!("{:.2}", p.capital));
        let _ = writeln!(
            out,
            "{:>6}  {with_spend:>18}  {:>18.2}",
            point.index, point.capital
        );
    }
    out
}
