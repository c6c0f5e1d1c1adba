//! Command dispatching.

use crate::cli::args::{CheckArgs, Cli, Commands};

use super::check::CheckCommand;

/// Routes CLI subcommands to their implementations.
#[derive(Debug, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch and execute a command, returning the process exit code.
    pub fn dispatch(&self, cli: &Cli) -> u8 {
        match &cli.command {
            Some(Commands::Check(args)) => CheckCommand::new(args.clone(), cli.no_color).execute(),
            None => match CheckArgs::implicit() {
                Ok(args) => CheckCommand::new(args, cli.no_color).execute(),
                Err(e) => {
                    e.print().ok();
                    e.exit_code() as u8
                }
            },
        }
    }
}
