//! Executable presence probe.
//!
//! The checker only needs to know whether the package manager binary can be
//! started. A bare name is looked up on PATH; a name containing a directory
//! is checked in place.

use std::path::{Path, PathBuf};

/// Answers whether a tool can be executed.
pub trait ToolProbe {
    /// Check if `tool` resolves to an executable file.
    fn is_installed(&self, tool: &Path) -> bool;
}

/// Probe backed by the filesystem and a list of PATH directories.
#[derive(Debug, Clone)]
pub struct PathProbe {
    path_entries: Vec<PathBuf>,
}

impl PathProbe {
    /// Probe using the current process PATH.
    pub fn from_env() -> Self {
        Self::with_path(parse_system_path())
    }

    /// Probe using explicit PATH entries.
    pub fn with_path(path_entries: Vec<PathBuf>) -> Self {
        Self { path_entries }
    }
}

impl ToolProbe for PathProbe {
    fn is_installed(&self, tool: &Path) -> bool {
        let found = if tool.components().count() > 1 {
            tool.is_file() && is_executable(tool)
        } else {
            tool.to_str()
                .and_then(|name| resolve_tool_path(name, &self.path_entries))
                .is_some()
        };
        tracing::debug!("Probe for {}: {}", tool.display(), found);
        found
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            for ext in ["exe", "cmd", "bat"] {
                let candidate = dir.join(format!("{tool}.{ext}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn resolves_bare_name_on_path() {
        let temp = TempDir::new().unwrap();
        make_executable(temp.path(), "yarn");

        let probe = PathProbe::with_path(vec![temp.path().to_path_buf()]);
        assert!(probe.is_installed(Path::new("yarn")));
    }

    #[test]
    fn missing_bare_name_is_not_installed() {
        let temp = TempDir::new().unwrap();
        let probe = PathProbe::with_path(vec![temp.path().to_path_buf()]);
        assert!(!probe.is_installed(Path::new("yarn")));
    }

    #[cfg(unix)]
    #[test]
    fn explicit_path_is_checked_in_place() {
        let temp = TempDir::new().unwrap();
        let yarn = make_executable(temp.path(), "yarn");

        let probe = PathProbe::with_path(vec![]);
        assert!(probe.is_installed(&yarn));
        assert!(!probe.is_installed(&temp.path().join("pnpm")));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_not_installed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("yarn");
        fs::write(&path, "").unwrap();

        assert!(!is_executable(&path));
        assert!(resolve_tool_path("yarn", &[temp.path().to_path_buf()]).is_none());
    }
}
