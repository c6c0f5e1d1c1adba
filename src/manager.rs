//! Package managers that expose a consistency check command.

use std::fmt;
use std::path::{Path, PathBuf};

/// Manifest file name shared by every node package manager.
pub const MANIFEST_FILE: &str = "package.json";

/// Directory dependencies are installed into.
pub const MODULES_DIR: &str = "node_modules";

/// A package manager whose installed tree can be checked against the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
}

impl PackageManager {
    /// Name of the executable.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::Yarn => "yarn",
        }
    }

    /// Lockfile pinning resolved versions.
    pub fn lockfile(&self) -> &'static str {
        match self {
            Self::Yarn => "yarn.lock",
        }
    }

    /// Arguments that run the check and emit line-delimited JSON.
    pub fn check_args(&self) -> &'static [&'static str] {
        match self {
            Self::Yarn => &["check", "--json"],
        }
    }

    /// Command users should run to fix an incomplete install.
    pub fn install_command(&self) -> String {
        format!("{} install", self.binary_name())
    }

    /// Error text the manager emits when no lockfile is present.
    ///
    /// A stream whose only error is exactly this message is reported as
    /// a missing lockfile rather than as missing dependencies.
    pub fn no_lockfile_message(&self) -> &'static str {
        match self {
            Self::Yarn => "No lockfile in this directory. Run `yarn install` to generate one.",
        }
    }

    /// Resolve the binary to invoke.
    ///
    /// An empty or missing override directory means the bare name, found
    /// through PATH at spawn time.
    pub fn binary_path(&self, override_dir: Option<&Path>) -> PathBuf {
        match override_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(self.binary_name()),
            _ => PathBuf::from(self.binary_name()),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}
