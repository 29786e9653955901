//! `grouper`: assigns medical services to hospitalization cases.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use grouper_cli::logging::init_logging;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_group, run_tables};
use crate::summary::print_summary;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Rejected rows still count as success; only fatal errors fail the run.
fn run(command: Command) -> Result<()> {
    match command {
        Command::Group(args) => {
            let summary = run_group(&args)?;
            print_summary(&summary);
        }
        Command::Tables(args) => run_tables(&args)?,
    }
    Ok(())
}
