//! Check orchestration.
//!
//! A checker validates the preconditions, runs the manager's check command,
//! feeds its events through a [`ResultAggregator`], and turns the result into
//! a summary or a [`CheckError`].
//!
//! # Example
//!
//! ```no_run
//! use depcheck::checker::{CheckRequest, DependencyChecker, YarnChecker};
//! use depcheck::reporter::{ConsoleReporter, Format};
//!
//! let request = CheckRequest::new("path/to/app");
//! let mut reporter = ConsoleReporter::stdout(Format::Short, false);
//! match YarnChecker::new(request).check(&mut reporter) {
//!     Ok(summary) => println!("{summary}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::aggregator::{AggregatedResult, ResultAggregator};
use crate::error::Result;
use crate::events;
use crate::manager::PackageManager;
use crate::preflight::PreflightValidator;
use crate::probe::{PathProbe, ToolProbe};
use crate::reporter::{Reporter, Status};
use crate::runner::{ManagerCommand, PtyProcess};

/// Which declared dependencies to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyTypes {
    #[default]
    All,
    Dependencies,
    DevDependencies,
}

impl FromStr for DependencyTypes {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "dependencies" => Ok(Self::Dependencies),
            "devDependencies" | "dev-dependencies" => Ok(Self::DevDependencies),
            _ => Err(format!("unknown dependency type: {}", s)),
        }
    }
}

impl fmt::Display for DependencyTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        })
    }
}

/// Inputs of one check invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    types: DependencyTypes,
    path: PathBuf,
    manager_path: Option<PathBuf>,
    timeout: Option<Duration>,
    skip_malformed_events: bool,
}

impl CheckRequest {
    /// Check everything in `path` with the default timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            types: DependencyTypes::All,
            path: path.into(),
            manager_path: None,
            timeout: Some(crate::config::DEFAULT_TIMEOUT),
            skip_malformed_events: false,
        }
    }

    pub fn with_types(mut self, types: DependencyTypes) -> Self {
        self.types = types;
        self
    }

    /// Directory containing the manager binary; `None` uses PATH.
    pub fn with_manager_path(mut self, manager_path: Option<PathBuf>) -> Self {
        self.manager_path = manager_path;
        self
    }

    /// Bound on the check command's runtime; `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip undecodable output lines instead of failing the check.
    pub fn with_skip_malformed_events(mut self, skip: bool) -> Self {
        self.skip_malformed_events = skip;
        self
    }

    pub fn types(&self) -> DependencyTypes {
        self.types
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manager_path(&self) -> Option<&Path> {
        self.manager_path.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn skip_malformed_events(&self) -> bool {
        self.skip_malformed_events
    }
}

/// A package-manager-specific dependency check.
pub trait DependencyChecker {
    /// The manager this checker drives.
    fn manager(&self) -> PackageManager;

    /// Run the check, reporting progress to `reporter`.
    ///
    /// Returns the success summary (already passed to `reporter.output`), or
    /// the single error that failed the check. Rendering the error is left
    /// to the caller.
    fn check(&self, reporter: &mut dyn Reporter) -> Result<String>;
}

/// Checks a project through `yarn check --json`.
pub struct YarnChecker {
    request: CheckRequest,
    probe: Box<dyn ToolProbe>,
}

impl YarnChecker {
    /// Create a checker that probes the real PATH.
    pub fn new(request: CheckRequest) -> Self {
        Self::with_probe(request, Box::new(PathProbe::from_env()))
    }

    /// Create a checker with a custom installation probe.
    pub fn with_probe(request: CheckRequest, probe: Box<dyn ToolProbe>) -> Self {
        Self { request, probe }
    }

    pub fn request(&self) -> &CheckRequest {
        &self.request
    }

    /// The binary to probe and spawn.
    ///
    /// A relative manager directory is taken relative to the project, where
    /// the check command runs. The result is made absolute so the probe and
    /// the spawned child agree on it.
    fn binary(&self) -> Result<PathBuf> {
        let dir = match self.request.manager_path() {
            Some(dir) if dir.is_relative() && !dir.as_os_str().is_empty() => {
                Some(std::env::current_dir()?.join(self.request.path()).join(dir))
            }
            other => other.map(Path::to_path_buf),
        };
        Ok(self.manager().binary_path(dir.as_deref()))
    }

    fn run_check(&self, binary: &Path, reporter: &mut dyn Reporter) -> Result<AggregatedResult> {
        let manager = self.manager();
        if self.request.types() != DependencyTypes::All {
            // yarn has no per-type check; everything is checked regardless.
            tracing::debug!(
                "{} checks all dependencies, ignoring '{}'",
                manager,
                self.request.types()
            );
        }

        reporter.check_start_output(&format!("all dependencies via {} check", manager));

        let command = ManagerCommand::new(manager, binary, self.request.path());
        let mut process = match PtyProcess::spawn(&command, self.request.timeout()) {
            Ok(process) => process,
            Err(e) => {
                reporter.check_finish_output();
                return Err(e);
            }
        };
        let mut aggregator = ResultAggregator::new();

        let streamed = self.stream(&mut process, &mut aggregator, reporter);
        reporter.check_finish_output();
        // On error the process is killed and reaped when dropped.
        streamed?;
        process.finish()?;

        Ok(aggregator.finish())
    }

    fn stream(
        &self,
        process: &mut PtyProcess,
        aggregator: &mut ResultAggregator,
        reporter: &mut dyn Reporter,
    ) -> Result<()> {
        for decoded in events::decode(process.lines()) {
            match decoded {
                Ok(event) => aggregator.record(event, reporter),
                Err(err) if self.request.skip_malformed_events() => {
                    tracing::warn!("Skipping malformed event: {}", err);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

impl DependencyChecker for YarnChecker {
    fn manager(&self) -> PackageManager {
        PackageManager::Yarn
    }

    fn check(&self, reporter: &mut dyn Reporter) -> Result<String> {
        let manager = self.manager();
        let binary = self.binary()?;

        let preflight =
            PreflightValidator::new(manager, self.probe.as_ref()).run(&binary, self.request.path())?;

        let result = self.run_check(&binary, reporter)?;
        let summary = result.evaluate(manager, preflight.manifest.total_count())?;

        reporter.output(&summary, Status::Success);
        Ok(summary)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::CheckError;
    use crate::events::Payload;
    use crate::reporter::MockReporter;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    const NO_LOCKFILE: &str = r#"{"type":"error","data":"No lockfile in this directory. Run `yarn install` to generate one."}"#;

    /// A project directory plus a fake `yarn` that prints `script` output.
    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new(manifest: &str, body: &str) -> Self {
            let temp = TempDir::new().unwrap();
            let app = temp.path().join("app");
            fs::create_dir_all(app.join("node_modules")).unwrap();
            fs::write(app.join("package.json"), manifest).unwrap();

            let bin = temp.path().join("bin");
            fs::create_dir(&bin).unwrap();
            let yarn = bin.join("yarn");
            fs::write(&yarn, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&yarn, fs::Permissions::from_mode(0o755)).unwrap();

            Self { temp }
        }

        fn printing(manifest: &str, lines: &[&str]) -> Self {
            Self::new(manifest, &format!("cat <<'EOF'\n{}\nEOF", lines.join("\n")))
        }

        fn app(&self) -> PathBuf {
            self.temp.path().join("app")
        }

        fn request(&self) -> CheckRequest {
            CheckRequest::new(self.app())
                .with_manager_path(Some(self.temp.path().join("bin")))
                .with_timeout(Some(Duration::from_secs(30)))
        }

        fn check(&self, request: CheckRequest) -> (Result<String>, MockReporter) {
            let mut reporter = MockReporter::new();
            let result = YarnChecker::new(request).check(&mut reporter);
            (result, reporter)
        }
    }

    #[test]
    fn dependency_types_parse() {
        assert_eq!("all".parse::<DependencyTypes>(), Ok(DependencyTypes::All));
        assert_eq!(
            "devDependencies".parse::<DependencyTypes>(),
            Ok(DependencyTypes::DevDependencies)
        );
        assert!("optional".parse::<DependencyTypes>().is_err());
        assert_eq!(DependencyTypes::Dependencies.to_string(), "dependencies");
    }

    #[test]
    fn request_defaults() {
        let request = CheckRequest::new("/app");
        assert_eq!(request.types(), DependencyTypes::All);
        assert_eq!(request.manager_path(), None);
        assert!(request.timeout().is_some());
        assert!(!request.skip_malformed_events());
    }

    #[test]
    fn clean_stream_reports_summary() {
        let fixture = Fixture::printing(
            r#"{"dependencies":{"a":"1","b":"1"},"devDependencies":{"c":"1","d":"1","e":"1"}}"#,
            &[
                r#"{"type":"info","data":"Checking dependencies"}"#,
                r#"{"type":"warning","data":"package.json: No license field"}"#,
                r#"{"type":"success","data":"a"}"#,
                r#"{"type":"success","data":"b"}"#,
                r#"{"type":"success","data":"Folder in sync."}"#,
            ],
        );

        let (result, reporter) = fixture.check(fixture.request());

        let summary = "Checked 5 packages. Warnings: 1. Errors: 0. Everything is ok.";
        assert_eq!(result.unwrap(), summary);
        assert_eq!(reporter.outputs(), &[(summary.to_string(), Status::Success)]);
        assert_eq!(reporter.deps_with(Status::Success).len(), 3);
        assert_eq!(reporter.deps_with(Status::Warn).len(), 1);
        assert_eq!(reporter.starts(), &["all dependencies via yarn check"]);
        assert_eq!(reporter.finishes(), 1);
    }

    #[test]
    fn two_errors_fail_with_missed_dependency() {
        let fixture = Fixture::printing(
            r#"{"dependencies":{"a":"1","b":"1"}}"#,
            &[
                r#"{"type":"error","data":"A missing"}"#,
                r#"{"type":"error","data":"B missing"}"#,
            ],
        );

        let (result, reporter) = fixture.check(fixture.request());

        match result.unwrap_err() {
            CheckError::MissedDependency { dependencies, .. } => assert_eq!(
                dependencies,
                vec![
                    Payload::Text("A missing".into()),
                    Payload::Text("B missing".into())
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(reporter.deps_with(Status::Failure), vec!["A missing", "B missing"]);
        assert!(reporter.outputs().is_empty());
    }

    #[test]
    fn lockfile_sentinel_fails_with_no_lock_file() {
        let fixture = Fixture::printing("{}", &[NO_LOCKFILE]);

        let (result, _) = fixture.check(fixture.request());

        assert!(matches!(result.unwrap_err(), CheckError::NoLockFile { .. }));
    }

    #[test]
    fn exit_code_is_ignored() {
        let fixture = Fixture::new("{}", "echo '{\"type\":\"success\",\"data\":\"ok\"}'\nexit 3");

        let (result, _) = fixture.check(fixture.request());

        assert!(result.is_ok());
    }

    #[test]
    fn malformed_line_aborts_by_default() {
        let fixture = Fixture::printing(
            "{}",
            &[r#"{"type":"success","data":"a"}"#, "yarn check v1.22.19"],
        );

        let (result, reporter) = fixture.check(fixture.request());

        assert!(matches!(result.unwrap_err(), CheckError::EventDecode { .. }));
        assert_eq!(reporter.finishes(), 1);
    }

    #[test]
    fn malformed_line_can_be_skipped() {
        let fixture = Fixture::printing(
            r#"{"dependencies":{"a":"1"}}"#,
            &["yarn check v1.22.19", r#"{"type":"success","data":"a"}"#],
        );

        let (result, _) = fixture.check(fixture.request().with_skip_malformed_events(true));

        assert_eq!(
            result.unwrap(),
            "Checked 1 packages. Warnings: 0. Errors: 0. Everything is ok."
        );
    }

    #[test]
    fn hung_check_times_out() {
        let fixture = Fixture::new("{}", "sleep 30");

        let request = fixture
            .request()
            .with_timeout(Some(Duration::from_millis(300)));
        let (result, _) = fixture.check(request);

        assert!(matches!(result.unwrap_err(), CheckError::Timeout { .. }));
    }

    #[test]
    fn precondition_failure_spawns_nothing() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("spawned");
        let fixture = Fixture::new("{}", &format!("touch {}", marker.display()));
        fs::remove_dir(fixture.app().join("node_modules")).unwrap();

        let (result, reporter) = fixture.check(fixture.request());

        assert!(matches!(result.unwrap_err(), CheckError::NoNodeModules { .. }));
        assert!(!marker.exists());
        assert!(reporter.starts().is_empty());
    }

    #[test]
    fn missing_directory_is_wrong_path() {
        let fixture = Fixture::printing("{}", &[]);
        let request = CheckRequest::new(fixture.temp.path().join("nope"))
            .with_manager_path(Some(fixture.temp.path().join("bin")));

        let (result, _) = fixture.check(request);

        assert!(matches!(result.unwrap_err(), CheckError::WrongPath { .. }));
    }

    #[test]
    fn relative_manager_path_resolves_against_project() {
        let fixture = Fixture::printing(
            r#"{"dependencies":{"a":"1"}}"#,
            &[r#"{"type":"success","data":"a"}"#],
        );
        let request = fixture
            .request()
            .with_manager_path(Some(PathBuf::from("../bin")));

        let (result, _) = fixture.check(request);

        assert_eq!(
            result.unwrap(),
            "Checked 1 packages. Warnings: 0. Errors: 0. Everything is ok."
        );
    }

    struct AlwaysInstalled;

    impl ToolProbe for AlwaysInstalled {
        fn is_installed(&self, _tool: &Path) -> bool {
            true
        }
    }

    #[test]
    fn spawn_failure_still_finishes_output() {
        let fixture = Fixture::printing("{}", &[]);
        let request = fixture
            .request()
            .with_manager_path(Some(fixture.temp.path().join("empty")));
        let mut reporter = MockReporter::new();

        let result = YarnChecker::with_probe(request, Box::new(AlwaysInstalled)).check(&mut reporter);

        assert!(matches!(result.unwrap_err(), CheckError::Spawn { .. }));
        assert_eq!(reporter.starts().len(), 1);
        assert_eq!(reporter.finishes(), 1);
    }

    #[test]
    fn missing_binary_is_tool_not_installed() {
        let fixture = Fixture::printing("{}", &[]);
        let request = fixture
            .request()
            .with_manager_path(Some(fixture.temp.path().join("empty")));

        let (result, _) = fixture.check(request);

        assert!(matches!(
            result.unwrap_err(),
            CheckError::ToolNotInstalled { .. }
        ));
    }
}
