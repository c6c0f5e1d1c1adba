//! Mock reporter implementation for testing.
//!
//! `MockReporter` implements the [`Reporter`] trait and records every call
//! for later assertion.

use crate::error::CheckError;

use super::{Reporter, Status};

/// Records reporter calls in order.
#[derive(Debug, Default)]
pub struct MockReporter {
    outputs: Vec<(String, Status)>,
    errors: Vec<String>,
    deps: Vec<(String, Status)>,
    starts: Vec<String>,
    finishes: usize,
}

impl MockReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `output` calls as (message, status).
    pub fn outputs(&self) -> &[(String, Status)] {
        &self.outputs
    }

    /// Rendered messages of all `error_output` calls.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All `dep_output` calls as (dependency, status).
    pub fn deps(&self) -> &[(String, Status)] {
        &self.deps
    }

    /// Dependencies reported with the given status, in call order.
    pub fn deps_with(&self, status: Status) -> Vec<&str> {
        self.deps
            .iter()
            .filter(|(_, s)| *s == status)
            .map(|(d, _)| d.as_str())
            .collect()
    }

    /// Labels passed to `check_start_output`.
    pub fn starts(&self) -> &[String] {
        &self.starts
    }

    /// Number of `check_finish_output` calls.
    pub fn finishes(&self) -> usize {
        self.finishes
    }

    /// Check if an output message containing `msg` was shown.
    pub fn has_output(&self, msg: &str) -> bool {
        self.outputs.iter().any(|(m, _)| m.contains(msg))
    }
}

impl Reporter for MockReporter {
    fn output(&mut self, message: &str, status: Status) {
        self.outputs.push((message.to_string(), status));
    }

    fn error_output(&mut self, error: &CheckError) {
        self.errors.push(error.to_string());
    }

    fn dep_output(&mut self, dependency: &str, status: Status) {
        self.deps.push((dependency.to_string(), status));
    }

    fn check_start_output(&mut self, label: &str) {
        self.starts.push(label.to_string());
    }

    fn check_finish_output(&mut self) {
        self.finishes += 1;
    }
}
