//! Command-line interface layer.
//!
//! ## Module Structure
//!
//! - `args`: clap argument definitions
//! - `run`: command dispatch, configuration overrides, file collection and the
//!   run's exit outcome
//! - `report`: text and JSON output

use std::process::ExitCode;

use anyhow::Result;

mod args;
mod report;
mod run;

pub use args::{Arguments, Command, ExtractArgs};
pub use run::Outcome;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(Outcome::Clean.exit_code());
    };

    let result = run::run(args)?;
    report::print(&result, verbose)?;

    Ok(result.outcome().exit_code())
}
