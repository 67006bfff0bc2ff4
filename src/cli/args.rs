//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract translation keys from source files
//! - `init`: Initialize a `.tolgeerc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(args)) => args.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Files or directories to extract from (default: the configured patterns)
    pub paths: Vec<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Namespace for keys that neither name one nor inherit one (overrides config file)
    #[arg(long, env = "TOLGEE_DEFAULT_NAMESPACE")]
    pub default_namespace: Option<String>,

    /// Report `t()` calls without a translation hook in scope (overrides config file)
    #[arg(long, value_name = "BOOL")]
    pub strict_namespace: Option<bool>,

    /// Per-file extraction timeout in milliseconds (overrides config file)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys and report problems found on the way
    Extract(ExtractArgs),
    /// Initialize a new .tolgeerc.json configuration file
    Init,
}
