//! Visual theme and styling.

use console::Style;

use super::Status;

/// Styles for reporter output.
#[derive(Debug, Clone)]
pub struct CheckTheme {
    /// Style for success lines (green).
    pub success: Style,
    /// Style for warning lines (orange).
    pub warning: Style,
    /// Style for failure lines (red bold).
    pub error: Style,
    /// Style for headers (bold).
    pub header: Style,
    /// Style for contextual hints (magenta dim).
    pub hint: Style,
}

impl Default for CheckTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            header: Style::new().bold(),
            hint: Style::new().magenta().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            header: Style::new(),
            hint: Style::new(),
        }
    }

    /// Style for a status.
    pub fn style(&self, status: Status) -> &Style {
        match status {
            Status::Success => &self.success,
            Status::Warn => &self.warning,
            Status::Failure => &self.error,
        }
    }

    /// Apply the status style to a message.
    pub fn paint(&self, msg: &str, status: Status) -> String {
        self.style(status).apply_to(msg).to_string()
    }

    /// Glyph for a status.
    pub fn glyph(status: Status) -> &'static str {
        match status {
            Status::Success => "✓",
            Status::Warn => "⚠",
            Status::Failure => "✗",
        }
    }

    /// Format a hint line.
    pub fn format_hint(&self, msg: &str) -> String {
        self.hint.apply_to(msg).to_string()
    }
}

/// Check if colors should be used.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
