//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Command, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;

use crate::checker::DependencyTypes;
use crate::reporter::Format;

/// depcheck - Check that installed node modules match package.json.
#[derive(Debug, Parser)]
#[command(name = "depcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check installed dependencies (default if no command specified)
    Check(CheckArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Project directory containing package.json
    #[arg(short, long, env = "DEPCHECK_PATH", default_value = ".")]
    pub path: PathBuf,

    /// Dependency types to check (all, dependencies, devDependencies)
    #[arg(short, long, default_value = "all")]
    pub types: DependencyTypes,

    /// Directory containing the yarn executable
    #[arg(long, env = "DEPCHECK_YARN_PATH", value_name = "DIR")]
    pub yarn_path: Option<PathBuf>,

    /// Output format (short, long, progress, doc)
    #[arg(short, long, env = "DEPCHECK_FORMAT")]
    pub format: Option<Format>,

    /// Give up on the check after this many seconds (0 waits forever)
    #[arg(long, env = "DEPCHECK_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip output lines that are not valid status events
    #[arg(long)]
    pub skip_malformed_events: bool,
}

impl CheckArgs {
    /// Arguments for `depcheck` run without a subcommand.
    ///
    /// Goes through clap so that `DEPCHECK_*` variables and defaults apply
    /// exactly as they do for an explicit `check`.
    pub fn implicit() -> Result<Self, clap::Error> {
        let matches = Self::augment_args(Command::new("check")).try_get_matches_from(["check"])?;
        Self::from_arg_matches(&matches)
    }
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            types: DependencyTypes::All,
            yarn_path: None,
            format: None,
            timeout: None,
            skip_malformed_events: false,
        }
    }
}
