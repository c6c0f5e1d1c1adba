//! Rendering of check progress and results.
//!
//! This module provides:
//! - [`Reporter`] trait consumed by checkers
//! - [`ConsoleReporter`] for terminal output in several [`Format`]s
//! - [`MockReporter`] for capturing calls in tests
//!
//! # Example
//!
//! ```
//! use depcheck::reporter::{MockReporter, Reporter, Status};
//!
//! let mut reporter = MockReporter::new();
//! reporter.dep_output("react@^18.0.0", Status::Success);
//! reporter.output("Everything is ok.", Status::Success);
//!
//! assert_eq!(reporter.deps_with(Status::Success).len(), 1);
//! assert!(reporter.has_output("Everything is ok."));
//! ```

pub mod console;
pub mod mock;
pub mod theme;

pub use console::{ConsoleReporter, Format};
pub use mock::MockReporter;
pub use theme::{should_use_colors, CheckTheme};

use crate::error::CheckError;

/// Outcome attached to a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warn,
    Failure,
}

/// Sink for check progress and results.
///
/// Checkers call these in a fixed order: `check_start_output`, any number of
/// `dep_output`, `check_finish_output`, then either `output` with the
/// summary or (from the caller) `error_output`.
pub trait Reporter {
    /// Display a plain status message.
    fn output(&mut self, message: &str, status: Status);

    /// Display the error that ended the check.
    fn error_output(&mut self, error: &CheckError);

    /// Display one dependency line reported by the package manager.
    fn dep_output(&mut self, dependency: &str, status: Status);

    /// Announce the start of a check.
    fn check_start_output(&mut self, label: &str);

    /// Announce the end of the event stream.
    fn check_finish_output(&mut self);
}
