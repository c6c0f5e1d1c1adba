//! depcheck - Check that installed node modules match `package.json`.
//!
//! depcheck runs a package manager's consistency check (`yarn check --json`)
//! on a pseudo-terminal, streams its status events as they are produced, and
//! reduces them to a one-line summary or a single descriptive error.
//!
//! # Modules
//!
//! - [`aggregator`] - Event accumulation and end-of-stream rules
//! - [`checker`] - Check requests and orchestration
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.depcheck.yml` loading and settings layering
//! - [`error`] - Error types and result aliases
//! - [`events`] - Status event decoding
//! - [`manager`] - Supported package managers
//! - [`manifest`] - `package.json` reading
//! - [`preflight`] - Preconditions checked before spawning
//! - [`probe`] - Executable presence probe
//! - [`reporter`] - Progress and result rendering
//! - [`runner`] - Pseudo-terminal process execution
//!
//! # Example
//!
//! ```
//! use depcheck::aggregator::ResultAggregator;
//! use depcheck::events::decode;
//! use depcheck::manager::PackageManager;
//! use depcheck::reporter::MockReporter;
//!
//! let lines = vec![
//!     r#"{"type":"warning","data":"package.json: No license field"}"#.to_string(),
//!     r#"{"type":"success","data":"Folder in sync."}"#.to_string(),
//! ];
//!
//! let mut reporter = MockReporter::new();
//! let mut aggregator = ResultAggregator::new();
//! aggregator.consume(decode(lines).filter_map(Result::ok), &mut reporter);
//!
//! let summary = aggregator.finish().evaluate(PackageManager::Yarn, 2).unwrap();
//! assert_eq!(summary, "Checked 2 packages. Warnings: 1. Errors: 0. Everything is ok.");
//! ```

pub mod aggregator;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod manifest;
pub mod preflight;
pub mod probe;
pub mod reporter;
pub mod runner;

pub use error::{CheckError, Result};
