//! Preconditions checked before the package manager is started.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the manager binary is installed
//! 2. the target directory exists
//! 3. it contains `package.json`
//! 4. `package.json` parses
//! 5. `node_modules` exists
//!
//! Nothing here has side effects, so a failure leaves nothing to undo.

use std::path::{Path, PathBuf};

use crate::error::{CheckError, Result};
use crate::manager::{PackageManager, MANIFEST_FILE, MODULES_DIR};
use crate::manifest::ManifestSnapshot;
use crate::probe::ToolProbe;

/// Facts established by a successful preflight.
#[derive(Debug, Clone)]
pub struct Preflight {
    pub manifest_path: PathBuf,
    pub manifest: ManifestSnapshot,
    pub modules_dir: PathBuf,
}

/// Runs the precondition checks for one manager.
pub struct PreflightValidator<'a> {
    manager: PackageManager,
    probe: &'a dyn ToolProbe,
}

impl<'a> PreflightValidator<'a> {
    pub fn new(manager: PackageManager, probe: &'a dyn ToolProbe) -> Self {
        Self { manager, probe }
    }

    /// Run all checks for `directory`, using `binary` as the manager executable.
    pub fn run(&self, binary: &Path, directory: &Path) -> Result<Preflight> {
        self.check_tool_installed(binary)?;
        check_directory_exists(directory)?;
        let manifest_path = check_manifest_exists(directory)?;
        let manifest = ManifestSnapshot::load(&manifest_path)?;
        let modules_dir = self.check_modules_directory(directory)?;

        tracing::debug!(
            "Preflight passed for {} ({} declared dependencies)",
            directory.display(),
            manifest.total_count()
        );

        Ok(Preflight {
            manifest_path,
            manifest,
            modules_dir,
        })
    }

    fn check_tool_installed(&self, binary: &Path) -> Result<()> {
        if self.probe.is_installed(binary) {
            Ok(())
        } else {
            Err(CheckError::ToolNotInstalled {
                tool: self.manager.binary_name().to_string(),
            })
        }
    }

    fn check_modules_directory(&self, directory: &Path) -> Result<PathBuf> {
        let modules_dir = directory.join(MODULES_DIR);
        if modules_dir.is_dir() {
            Ok(modules_dir)
        } else {
            Err(CheckError::NoNodeModules {
                path: directory.to_path_buf(),
                manager: self.manager,
            })
        }
    }
}

fn check_directory_exists(directory: &Path) -> Result<()> {
    if directory.is_dir() {
        Ok(())
    } else {
        Err(CheckError::WrongPath {
            directory: directory.to_path_buf(),
        })
    }
}

fn check_manifest_exists(directory: &Path) -> Result<PathBuf> {
    let manifest_path = directory.join(MANIFEST_FILE);
    if manifest_path.is_file() {
        Ok(manifest_path)
    } else {
        Err(CheckError::MissedPackage {
            directory: directory.to_path_buf(),
        })
    }
}
