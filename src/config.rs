//! Configuration loading and layering.
//!
//! Settings are merged in priority order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project file: `.depcheck.yml` in the checked directory
//! 3. Command-line flags and `DEPCHECK_*` environment variables

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::checker::{CheckRequest, DependencyTypes};
use crate::error::{CheckError, Result};
use crate::reporter::Format;

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = ".depcheck.yml";

/// Default bound on the check command's runtime.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Contents of `.depcheck.yml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub format: Option<String>,
    pub color: Option<bool>,
    /// Seconds; `0` disables the timeout.
    pub timeout_secs: Option<u64>,
    pub skip_malformed_events: Option<bool>,
    pub yarn_path: Option<PathBuf>,
}

impl FileConfig {
    /// Load `.depcheck.yml` from `directory`, if present.
    pub fn discover(directory: &Path) -> Result<Option<Self>> {
        let path = directory.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!("Loading config from {}", path.display());
        Self::load(&path).map(Some)
    }

    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CheckError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Parse config content; `path` is only used for error context.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CheckError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format: Option<Format>,
    pub no_color: bool,
    pub timeout_secs: Option<u64>,
    pub skip_malformed_events: bool,
    pub yarn_path: Option<PathBuf>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: Format,
    pub color: bool,
    pub timeout: Option<Duration>,
    pub skip_malformed_events: bool,
    pub yarn_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: Format::default(),
            color: true,
            timeout: Some(DEFAULT_TIMEOUT),
            skip_malformed_events: false,
            yarn_path: None,
        }
    }
}

impl Settings {
    /// Merge defaults, the optional project file, and command-line overrides.
    pub fn resolve(file: Option<(&Path, FileConfig)>, overrides: &Overrides) -> Result<Self> {
        let mut settings = Self::default();

        if let Some((path, file)) = file {
            if let Some(format) = file.format {
                settings.format = format.parse().map_err(|message| CheckError::Config {
                    path: path.to_path_buf(),
                    message,
                })?;
            }
            if let Some(color) = file.color {
                settings.color = color;
            }
            if let Some(secs) = file.timeout_secs {
                settings.timeout = timeout_from_secs(secs);
            }
            if let Some(skip) = file.skip_malformed_events {
                settings.skip_malformed_events = skip;
            }
            if file.yarn_path.is_some() {
                settings.yarn_path = file.yarn_path;
            }
        }

        if let Some(format) = overrides.format {
            settings.format = format;
        }
        if overrides.no_color {
            settings.color = false;
        }
        if let Some(secs) = overrides.timeout_secs {
            settings.timeout = timeout_from_secs(secs);
        }
        if overrides.skip_malformed_events {
            settings.skip_malformed_events = true;
        }
        if overrides.yarn_path.is_some() {
            settings.yarn_path = overrides.yarn_path.clone();
        }

        Ok(settings)
    }

    /// Build the check request for `path`.
    pub fn request(&self, path: &Path, types: DependencyTypes) -> CheckRequest {
        CheckRequest::new(path)
            .with_types(types)
            .with_manager_path(self.yarn_path.clone())
            .with_timeout(self.timeout)
            .with_skip_malformed_events(self.skip_malformed_events)
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
