//! NDC purchase-history report CLI.

use clap::Parser;

mod cli;
mod commands;
mod input;
mod logging;

use crate::cli::Cli;
use crate::commands::run;
use crate::logging::{init_logging, LogConfig};

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(summary) => {
            tracing::info!(
                targets = summary.targets,
                facilities = summary.facilities,
                matched = summary.matched,
                "report complete"
            );
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
