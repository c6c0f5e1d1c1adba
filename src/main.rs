//! depcheck CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use depcheck::cli::{Cli, CommandDispatcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so they never mix with reporter output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("depcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depcheck=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("depcheck starting with args: {:?}", cli);

    let dispatcher = CommandDispatcher::new();
    ExitCode::from(dispatcher.dispatch(&cli))
}
