use clap::Parser;
use tracing::error;

use spendcalc::cli::{Cli, Command, input_error_from_clap, run_calculate};

#[tokio::main]
async fn main() {
    spendcalc::logging::init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match input_error_from_clap(&err) {
            Some(e) => {
                eprintln!("Input error: {e}");
                std::process::exit(1);
            }
            None => err.exit(),
        },
    };

    match cli.command {
        Command::Calculate(args) => match run_calculate(&args) {
            Ok(out) => print!("{out}"),
            Err(e) => {
                eprintln!("Input error: {e}");
                std::process::exit(1);
            }
        },
        Command::Serve(args) => {
            if let Err(e) = spendcalc::api::run_http_server(args.port).await {
                error!(%e, "server error");
                std::process::exit(1);
            }
        }
    }
}
