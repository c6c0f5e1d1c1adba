//! `package.json` reading.
//!
//! Only the declared dependency maps matter here; every other field of the
//! manifest is ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CheckError, Result};

/// Declared dependencies of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ManifestSnapshot {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, Value>>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<BTreeMap<String, Value>>,
}

impl ManifestSnapshot {
    /// Parse manifest bytes.
    ///
    /// Content that is not UTF-8 JSON with object-valued dependency maps is
    /// rejected as [`CheckError::JsonParseError`] for `path`. Entry values
    /// are not interpreted.
    pub fn parse(content: &[u8], path: &Path) -> Result<Self> {
        serde_json::from_slice(content).map_err(|e| {
            tracing::debug!("Failed to parse {}: {}", path.display(), e);
            CheckError::JsonParseError {
                path: path.to_path_buf(),
            }
        })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read(path)?;
        Self::parse(&content, path)
    }

    /// Names of runtime dependencies.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        names(&self.dependencies)
    }

    /// Names of development dependencies.
    pub fn dev_dependencies(&self) -> impl Iterator<Item = &str> {
        names(&self.dev_dependencies)
    }

    /// Number of declared dependencies across both maps.
    pub fn total_count(&self) -> usize {
        self.dependencies().count() + self.dev_dependencies().count()
    }
}

fn names(map: &Option<BTreeMap<String, Value>>) -> impl Iterator<Item = &str> {
    map.iter().flat_map(|m| m.keys()).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<ManifestSnapshot> {
        ManifestSnapshot::parse(content.as_bytes(), Path::new("package.json"))
    }

    #[test]
    fn empty_object_counts_zero() {
        assert_eq!(parse("{}").unwrap().total_count(), 0);
    }

    #[test]
    fn empty_dev_dependencies_counted_as_zero() {
        let manifest = parse(r#"{"dependencies":{"a":"1"},"devDependencies":{}}"#).unwrap();
        assert_eq!(manifest.total_count(), 1);
    }

    #[test]
    fn counts_both_maps() {
        let manifest = parse(
            r#"{
                "name": "app",
                "dependencies": {"react": "^18.0.0", "lodash": "4.17.21"},
                "devDependencies": {"jest": "29", "eslint": "8", "prettier": "3"}
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.total_count(), 5);
        assert_eq!(manifest.dependencies().count(), 2);
        assert_eq!(
            manifest.dev_dependencies().collect::<Vec<_>>(),
            vec!["eslint", "jest", "prettier"]
        );
    }

    #[test]
    fn null_maps_count_zero() {
        let manifest = parse(r#"{"dependencies":null,"devDependencies":null}"#).unwrap();
        assert_eq!(manifest.total_count(), 0);
    }

    #[test]
    fn invalid_json_is_parse_error_with_path() {
        let err = ManifestSnapshot::parse(b"{ not json", Path::new("/app/package.json"))
            .unwrap_err();
        match err {
            CheckError::JsonParseError { path } => {
                assert_eq!(path, PathBuf::from("/app/package.json"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        std::fs::write(&path, r#"{"devDependencies":{"a":"1","b":"2"}}"#).unwrap();

        assert_eq!(ManifestSnapshot::load(&path).unwrap().total_count(), 2);
    }

    #[test]
    fn non_string_entries_are_counted() {
        let manifest = parse(
            r#"{"dependencies":{"a":"1","b":{"version":"2"}},"devDependencies":{"c":1}}"#,
        )
        .unwrap();
        assert_eq!(manifest.total_count(), 3);
        assert_eq!(manifest.dependencies().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn invalid_utf8_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        std::fs::write(&path, b"{\xff\xfe}").unwrap();

        match ManifestSnapshot::load(&path).unwrap_err() {
            CheckError::JsonParseError { path: reported } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
