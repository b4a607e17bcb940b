//! sharedvol: named volumes on a filesystem shared by many hosts.
//!
//! This is the main entry point for the `sharedvol` CLI. It parses arguments,
//! loads the config, sets up logging, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fs;
mod logging;
pub mod registry;
pub mod volume;

#[cfg(test)]
mod test_support;

use cli::Cli;
use config::Config;
use error::Result;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.global.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    logging::init(&config.log_filter, cli.global.debug);

    commands::dispatch(cli, &config)
}
