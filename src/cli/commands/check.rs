//! Check command implementation.
//!
//! The `depcheck check` command resolves settings, runs the yarn checker,
//! and renders the outcome.

use crate::checker::{DependencyChecker, YarnChecker};
use crate::cli::args::CheckArgs;
use crate::config::{FileConfig, Overrides, Settings, CONFIG_FILE};
use crate::error::Result;
use crate::reporter::{should_use_colors, ConsoleReporter, Format, Reporter};

/// The check command implementation.
#[derive(Debug)]
pub struct CheckCommand {
    args: CheckArgs,
    no_color: bool,
}

impl CheckCommand {
    pub fn new(args: CheckArgs, no_color: bool) -> Self {
        Self { args, no_color }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    /// Resolve settings from `.depcheck.yml` and the command line.
    pub fn settings(&self) -> Result<Settings> {
        let file = FileConfig::discover(&self.args.path)?;
        let config_path = self.args.path.join(CONFIG_FILE);
        let overrides = Overrides {
            format: self.args.format,
            no_color: self.no_color,
            timeout_secs: self.args.timeout,
            skip_malformed_events: self.args.skip_malformed_events,
            yarn_path: self.args.yarn_path.clone(),
        };
        Settings::resolve(file.map(|f| (config_path.as_path(), f)), &overrides)
    }

    /// Run against stdout and return the exit code.
    pub fn execute(&self) -> u8 {
        let settings = match self.settings() {
            Ok(settings) => settings,
            Err(e) => {
                let colors = !self.no_color && should_use_colors();
                ConsoleReporter::stdout(Format::Short, colors).error_output(&e);
                return e.exit_code();
            }
        };

        let colors = settings.color && should_use_colors();
        let mut reporter = ConsoleReporter::stdout(settings.format, colors);
        self.run(&settings, &mut reporter)
    }

    /// Run with resolved settings against any reporter.
    pub fn run(&self, settings: &Settings, reporter: &mut dyn Reporter) -> u8 {
        let request = settings.request(&self.args.path, self.args.types);
        match YarnChecker::new(request).check(reporter) {
            Ok(_) => 0,
            Err(e) => {
                tracing::debug!("Check failed: {:?}", e);
                reporter.error_output(&e);
                e.exit_code()
            }
        }
    }
}
