use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::{InputError, ScenarioInput, Withdrawal, run_scenario};
use crate::report::{build_calculate_response, summary, trajectory_table};

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CAPITAL: f64 = 20_000.0;
const DEFAULT_RATE_PERCENT: f64 = 9.0;
const DEFAULT_TARGET: f64 = 200_000.0;
const DEFAULT_YEARS: u32 = 30;
const DEFAULT_LUMP_SUM: f64 = 1_000.0;
const DEFAULT_MONTHLY: f64 = 200.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliWithdrawalMode {
    LumpSum,
    Monthly,
}

#[derive(Parser, Debug)]
#[command(
    name = "spendcalc",
    version,
    about = "Earliest point to spend a lump sum or a monthly amount and still reach a savings goal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one calculation and print the outcome.
    Calculate(CalculateArgs),
    /// Serve the web form and the JSON API.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    #[arg(long, default_value_t = DEFAULT_CAPITAL, help = "Initial capital")]
    pub capital: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_RATE_PERCENT,
        allow_hyphen_values = true,
        help = "Annual performance in percent, e.g. 9"
    )]
    pub rate_percent: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_TARGET,
        help = "Target amount at the end of the horizon"
    )]
    pub target: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS, help = "Total years")]
    pub years: u32,
    #[arg(long, value_enum, default_value_t = CliWithdrawalMode::LumpSum)]
    pub mode: CliWithdrawalMode,
    #[arg(
        long,
        default_value_t = DEFAULT_LUMP_SUM,
        help = "One-time withdrawal, used when --mode=lump-sum"
    )]
    pub lump_sum: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MONTHLY,
        help = "Recurring monthly withdrawal, used when --mode=monthly"
    )]
    pub monthly: f64,
}

impl Default for ScenarioArgs {
    fn default() -> Self {
        Self {
            capital: DEFAULT_CAPITAL,
            rate_percent: DEFAULT_RATE_PERCENT,
            target: DEFAULT_TARGET,
            years: DEFAULT_YEARS,
            mode: CliWithdrawalMode::LumpSum,
            lump_sum: DEFAULT_LUMP_SUM,
            monthly: DEFAULT_MONTHLY,
        }
    }
}

#[derive(Args, Debug)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
    #[arg(long, help = "Print the JSON body the HTTP API would return")]
    pub json: bool,
    #[arg(long, help = "Also print the capital trajectory with and without spending")]
    pub trajectory: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "SPENDCALC_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

// Text in a numeric flag reads like the form's invalid-number case; everything else stays clap's.
pub fn input_error_from_clap(err: &clap::Error) -> Option<InputError> {
    match err.kind() {
        ErrorKind::ValueValidation => Some(InputError::NotNumeric),
        _ => None,
    }
}

pub fn build_input(args: &ScenarioArgs) -> Result<ScenarioInput, InputError> {
    let withdrawal = match args.mode {
        CliWithdrawalMode::LumpSum => Withdrawal::LumpSum {
            amount: args.lump_sum,
        },
        CliWithdrawalMode::Monthly => Withdrawal::Monthly {
            amount: args.monthly,
        },
    };

    let input = ScenarioInput {
        capital: args.capital,
        annual_rate: args.rate_percent / 100.0,
        target: args.target,
        years: args.years,
        withdrawal,
    };
    input.validate()?;
    Ok(input)
}

pub fn run_calculate(args: &CalculateArgs) -> Result<String, InputError> {
    let input = build_input(&args.scenario)?;
    let report = run_scenario(&input)?;

    if args.json {
        let response = build_calculate_response(&report);
        let body = serde_json::to_string_pretty(&response)
            .expect("calculate response has only string keys and plain values");
        return Ok(format!("{body}\n"));
    }

    let mut out = summary(&report);
    out.push('\n');
    if args.trajectory {
        out.push('\n');
        out.push_str(&trajectory_table(&report));
    }
    Ok(out)
}
