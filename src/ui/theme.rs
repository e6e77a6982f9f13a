//! Visual theme and styling.

use console::Style;

use crate::status::IssueSeverity;

/// Styles used for terminal output.
#[derive(Debug, Clone)]
pub struct HarmonizerTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Informational issues.
    pub info: Style,
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
    /// Fix hints.
    pub hint: Style,
    /// Labels in key-value displays.
    pub key: Style,
}

impl Default for HarmonizerTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl HarmonizerTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
            key: Style::new().bold(),
        }
    }

    /// Theme without colors (non-TTY or `--no-color`).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            hint: Style::new(),
            key: Style::new(),
        }
    }

    /// Colored theme unless colors are disabled.
    pub fn for_terminal(no_color: bool) -> Self {
        if !no_color && should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("◆ {}", title)))
    }

    /// Symbol for a severity.
    pub fn severity_symbol(severity: IssueSeverity) -> &'static str {
        match severity {
            IssueSeverity::Error => "✗",
            IssueSeverity::Warning => "⚠",
            IssueSeverity::Info => "ℹ",
        }
    }

    pub fn severity_style(&self, severity: IssueSeverity) -> &Style {
        match severity {
            IssueSeverity::Error => &self.error,
            IssueSeverity::Warning => &self.warning,
            IssueSeverity::Info => &self.info,
        }
    }

    /// Symbol and message styled for a severity.
    pub fn format_issue(&self, severity: IssueSeverity, msg: &str) -> String {
        format!(
            "{}",
            self.severity_style(severity)
                .apply_to(format!("{} {}", Self::severity_symbol(severity), msg))
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}
