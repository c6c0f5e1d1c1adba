//! Aggregation of status events into a check outcome.
//!
//! [`ResultAggregator`] is fed events one at a time while the check command
//! runs. Every event is forwarded to the [`Reporter`]; errors and warnings are
//! also kept, in arrival order. Once the stream ends, [`AggregatedResult::evaluate`]
//! applies the end-of-stream rules:
//!
//! 1. A lone error equal to the manager's no-lockfile message is
//!    [`CheckError::NoLockFile`].
//! 2. Any other non-empty error list is [`CheckError::MissedDependency`].
//! 3. Otherwise the check succeeded and a summary line is produced.

use crate::error::{CheckError, Result};
use crate::events::{Event, Payload};
use crate::manager::PackageManager;
use crate::reporter::{Reporter, Status};

/// Errors and warnings collected from one event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedResult {
    errors: Vec<Payload>,
    warnings: Vec<Payload>,
}

impl AggregatedResult {
    /// Error payloads in arrival order.
    pub fn errors(&self) -> &[Payload] {
        &self.errors
    }

    /// Warning payloads in arrival order.
    pub fn warnings(&self) -> &[Payload] {
        &self.warnings
    }

    /// True when no error event was seen.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Apply the end-of-stream rules.
    ///
    /// Returns the success summary for `total_count` declared packages, or
    /// the error that fails the check.
    pub fn evaluate(self, manager: PackageManager, total_count: usize) -> Result<String> {
        if self.is_no_lockfile(manager) {
            return Err(CheckError::NoLockFile { manager });
        }

        if !self.errors.is_empty() {
            return Err(CheckError::MissedDependency {
                dependencies: self.errors,
                manager,
            });
        }

        Ok(format!(
            "Checked {} packages. Warnings: {}. Errors: 0. Everything is ok.",
            total_count,
            self.warnings.len()
        ))
    }

    fn is_no_lockfile(&self, manager: PackageManager) -> bool {
        matches!(
            self.errors.as_slice(),
            [Payload::Text(only)] if only == manager.no_lockfile_message()
        )
    }
}

/// Accumulates events into an [`AggregatedResult`].
#[derive(Debug, Default)]
pub struct ResultAggregator {
    result: AggregatedResult,
}

impl ResultAggregator {
    /// Create an aggregator with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event and report it.
    pub fn record(&mut self, event: Event, reporter: &mut dyn Reporter) {
        match event {
            Event::Error(payload) => {
                reporter.dep_output(&payload.to_string(), Status::Failure);
                self.result.errors.push(payload);
            }
            Event::Warning(payload) => {
                reporter.dep_output(&payload.to_string(), Status::Warn);
                self.result.warnings.push(payload);
            }
            Event::Success(payload) => {
                reporter.dep_output(&payload.to_string(), Status::Success);
            }
            Event::ActivityTick(name) => {
                reporter.dep_output(&name, Status::Success);
            }
        }
    }

    /// Record every event of a finished sequence.
    pub fn consume<I>(&mut self, events: I, reporter: &mut dyn Reporter)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.record(event, reporter);
        }
    }

    /// End aggregation.
    pub fn finish(self) -> AggregatedResult {
        tracing::debug!(
            "Stream ended with {} errors and {} warnings",
            self.result.errors.len(),
            self.result.warnings.len()
        );
        self.result
    }
}
