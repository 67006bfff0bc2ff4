use std::io;
use std::process::ExitCode;

use clap::Parser;
use tolgee_extract::cli::{Arguments, Outcome};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("TOLGEE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Arguments::parse();
    match tolgee_extract::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            Outcome::Failed.exit_code()
        }
    }
}
