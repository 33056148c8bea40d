use std::process::ExitCode;

use clap::Parser;
use engine_logging::engine_info;

mod cli;
mod error;
mod report;
mod run;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    engine_logging::initialize(cli.log_destination(), cli.log_level());

    match run::run(&cli) {
        Ok(summary) => {
            engine_info!(
                "{} of {} attachments downloaded",
                summary.succeeded,
                summary.total
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
