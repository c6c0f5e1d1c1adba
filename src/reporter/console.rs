//! Terminal reporters.

use std::io::{self, Write};
use std::str::FromStr;

use crate::error::CheckError;

use super::theme::CheckTheme;
use super::{Reporter, Status};

/// How dependency lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Only the summary and errors.
    #[default]
    Short,
    /// One line per dependency with a status glyph.
    Long,
    /// A `.` per passing dependency and an `F` per failing one.
    Progress,
    /// One indented, colored line per dependency.
    Doc,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            "progress" => Ok(Self::Progress),
            "doc" | "documentation" => Ok(Self::Doc),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

/// Reporter writing to a terminal (or any writer).
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    format: Format,
    theme: CheckTheme,
}

impl ConsoleReporter<io::Stdout> {
    /// Create a reporter printing to stdout.
    pub fn stdout(format: Format, colors: bool) -> Self {
        let theme = if colors {
            CheckTheme::new()
        } else {
            CheckTheme::plain()
        };
        Self::with_writer(io::stdout(), format, theme)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Create a reporter printing to `out`.
    pub fn with_writer(out: W, format: Format, theme: CheckTheme) -> Self {
        Self { out, format, theme }
    }

    /// The configured format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn inline(&mut self, text: &str) {
        write!(self.out, "{}", text).ok();
        self.out.flush().ok();
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn output(&mut self, message: &str, status: Status) {
        let painted = self.theme.paint(message, status);
        self.line(&painted);
    }

    fn error_output(&mut self, error: &CheckError) {
        let painted = self.theme.paint(&error.to_string(), Status::Failure);
        self.line(&painted);

        if let CheckError::MissedDependency { dependencies, .. } = error {
            for dependency in dependencies {
                let item = self
                    .theme
                    .paint(&format!("  - {}", dependency), Status::Failure);
                self.line(&item);
            }
        }

        if let Some(hint) = error.hint() {
            let hint = self.theme.format_hint(&hint);
            self.line(&hint);
        }
    }

    fn dep_output(&mut self, dependency: &str, status: Status) {
        match self.format {
            Format::Short => {}
            Format::Long => {
                let text = format!("  {} {}", CheckTheme::glyph(status), dependency);
                let painted = self.theme.paint(&text, status);
                self.line(&painted);
            }
            Format::Doc => {
                let painted = self.theme.paint(&format!("  {}", dependency), status);
                self.line(&painted);
            }
            Format::Progress => match status {
                Status::Success => {
                    let dot = self.theme.paint(".", status);
                    self.inline(&dot);
                }
                Status::Failure => {
                    let mark = self.theme.paint("F", status);
                    self.inline(&mark);
                }
                Status::Warn => {}
            },
        }
    }

    fn check_start_output(&mut self, label: &str) {
        let header = self
            .theme
            .header
            .apply_to(format!("Checking {}:", label))
            .to_string();
        self.line(&header);
    }

    fn check_finish_output(&mut self) {
        match self.format {
            Format::Progress => self.inline("\n\n"),
            Format::Long | Format::Doc => self.line(""),
            Format::Short => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Payload;
    use crate::manager::PackageManager;

    fn reporter(format: Format) -> ConsoleReporter<Vec<u8>> {
        ConsoleReporter::with_writer(Vec::new(), format, CheckTheme::plain())
    }

    fn rendered(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn format_from_str() {
        assert_eq!("short".parse::<Format>(), Ok(Format::Short));
        assert_eq!("PROGRESS".parse::<Format>(), Ok(Format::Progress));
        assert_eq!("documentation".parse::<Format>(), Ok(Format::Doc));
        assert!("fancy".parse::<Format>().is_err());
    }

    #[test]
    fn progress_prints_dots_and_failures() {
        let mut r = reporter(Format::Progress);
        r.dep_output("a", Status::Success);
        r.dep_output("b", Status::Warn);
        r.dep_output("c", Status::Failure);
        r.dep_output("d", Status::Success);
        r.check_finish_output();
        assert_eq!(rendered(r), ".F.\n\n");
    }

    #[test]
    fn long_prints_glyph_per_dependency() {
        let mut r = reporter(Format::Long);
        r.dep_output("react", Status::Success);
        r.dep_output("No license field", Status::Warn);
        let out = rendered(r);
        assert!(out.contains("  ✓ react\n"));
        assert!(out.contains("  ⚠ No license field\n"));
    }

    #[test]
    fn short_hides_dependencies() {
        let mut r = reporter(Format::Short);
        r.check_start_output("all dependencies via yarn check");
        r.dep_output("react", Status::Success);
        r.check_finish_output();
        r.output("Everything is ok.", Status::Success);
        assert_eq!(
            rendered(r),
            "Checking all dependencies via yarn check:\nEverything is ok.\n"
        );
    }

    #[test]
    fn missed_dependency_lists_each_entry_and_hint() {
        let mut r = reporter(Format::Short);
        r.error_output(&CheckError::MissedDependency {
            dependencies: vec![
                Payload::Text("A missing".into()),
                Payload::Text("B missing".into()),
            ],
            manager: PackageManager::Yarn,
        });
        let out = rendered(r);
        let a = out.find("  - A missing").unwrap();
        let b = out.find("  - B missing").unwrap();
        assert!(a < b);
        assert!(out.ends_with("Run `yarn install` to install missing packages.\n"));
    }

    #[test]
    fn error_without_hint_is_single_line() {
        let mut r = reporter(Format::Doc);
        r.error_output(&CheckError::MissedPackage {
            directory: "/app".into(),
        });
        assert_eq!(rendered(r).lines().count(), 1);
    }
}
