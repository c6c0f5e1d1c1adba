//! Command-line interface for depcheck.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands};
pub use commands::{CheckCommand, CommandDispatcher};
