//! Error types for dependency checks.
//!
//! This module defines [`CheckError`], the error type shared by every
//! manager-specific checker, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is terminal: the first one raised ends the check
//! - Variants carry the context needed to render them (paths, manager, payloads)
//! - `anyhow::Error` (via `CheckError::Other`) only appears at the pty seam

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::events::Payload;
use crate::manager::PackageManager;

/// Core error type for dependency checks.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The package manager binary could not be found.
    #[error("{tool} is not installed or not on PATH")]
    ToolNotInstalled { tool: String },

    /// Target directory does not exist.
    #[error("There is no '{}' directory", directory.display())]
    WrongPath { directory: PathBuf },

    /// No package.json in the target directory.
    #[error("There is no package.json file inside '{}' directory", directory.display())]
    MissedPackage { directory: PathBuf },

    /// The manifest exists but is not valid JSON.
    #[error("Can't parse JSON file {}", path.display())]
    JsonParseError { path: PathBuf },

    /// Dependencies have never been installed.
    #[error("There is no node_modules folder inside '{}' directory", path.display())]
    NoNodeModules {
        path: PathBuf,
        manager: PackageManager,
    },

    /// The manager reported that no lockfile exists.
    #[error("There is no {} file in the directory", manager.lockfile())]
    NoLockFile { manager: PackageManager },

    /// One or more dependencies are missing or mismatched.
    #[error("Following dependencies are not installed or have mismatched versions ({})", dependencies.len())]
    MissedDependency {
        dependencies: Vec<Payload>,
        manager: PackageManager,
    },

    /// A line from the check command was not a valid status event.
    #[error("Can't decode status event '{line}': {message}")]
    EventDecode { line: String, message: String },

    /// The check command did not finish in time.
    #[error("'{command}' did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The check command could not be started.
    #[error("Failed to start '{command}': {message}")]
    Spawn { command: String, message: String },

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CheckError {
    /// Suggested next action for the user, if there is one.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ToolNotInstalled { tool } => {
                Some(format!("Install {tool} or pass its directory with --yarn-path."))
            }
            Self::NoNodeModules { manager, .. } => Some(format!(
                "Run `{}` to install dependencies.",
                manager.install_command()
            )),
            Self::NoLockFile { manager } => Some(format!(
                "Run `{}` to generate one.",
                manager.install_command()
            )),
            Self::MissedDependency { manager, .. } => Some(format!(
                "Run `{}` to install missing packages.",
                manager.install_command()
            )),
            Self::Timeout { .. } => Some("Raise the limit with --timeout.".to_string()),
            _ => None,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for dependency checks.
pub type Result<T> = std::result::Result<T, CheckError>;
