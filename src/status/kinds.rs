//! Closed classifications used throughout a status snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system flavor the project is being developed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsKind {
    WindowsNative,
    Wsl,
    Linux,
    MacOs,
    Unknown,
}

impl OsKind {
    /// Family this binary was built for; used when no OS fact was collected.
    pub fn host() -> Self {
        if cfg!(windows) {
            OsKind::WindowsNative
        } else if cfg!(target_os = "macos") {
            OsKind::MacOs
        } else {
            OsKind::Linux
        }
    }

    /// Whether activation scripts live under `Scripts\` rather than `bin/`.
    pub fn uses_windows_layout(&self) -> bool {
        matches!(self, OsKind::WindowsNative)
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OsKind::WindowsNative => "Windows",
            OsKind::Wsl => "WSL",
            OsKind::Linux => "Linux",
            OsKind::MacOs => "macOS",
            OsKind::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Kind of Python virtual environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenvKind {
    Virtualenv,
    Conda,
    Pipenv,
    Poetry,
    None,
}

impl fmt::Display for VenvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VenvKind::Virtualenv => "virtualenv",
            VenvKind::Conda => "conda",
            VenvKind::Pipenv => "pipenv",
            VenvKind::Poetry => "poetry",
            VenvKind::None => "none",
        };
        write!(f, "{}", label)
    }
}

/// Issue severity, ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Info => write!(f, "info"),
            IssueSeverity::Warning => write!(f, "warning"),
            IssueSeverity::Error => write!(f, "error"),
        }
    }
}

/// Area of the environment an issue belongs to.
///
/// Each fixer owns exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Os,
    Python,
    Venv,
    Dependency,
    Config,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Os => "os",
            IssueCategory::Python => "python",
            IssueCategory::Venv => "venv",
            IssueCategory::Dependency => "dependency",
            IssueCategory::Config => "config",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(IssueSeverity::Info < IssueSeverity::Warning);
        assert!(IssueSeverity::Warning < IssueSeverity::Error);
        assert_eq!(
            [IssueSeverity::Error, IssueSeverity::Info, IssueSeverity::Warning]
                .iter()
                .max(),
            Some(&IssueSeverity::Error)
        );
    }

    #[test]
    fn serialized_names_are_stable() {
        assert_eq!(serde_json::to_string(&OsKind::WindowsNative).unwrap(), "\"windows_native\"");
        assert_eq!(serde_json::to_string(&OsKind::MacOs).unwrap(), "\"mac_os\"");
        assert_eq!(serde_json::to_string(&VenvKind::None).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&IssueSeverity::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&IssueCategory::Dependency).unwrap(), "\"dependency\"");
    }

    #[test]
    fn display_labels() {
        assert_eq!(OsKind::Wsl.to_string(), "WSL");
        assert_eq!(VenvKind::Conda.to_string(), "conda");
        assert_eq!(IssueCategory::Config.to_string(), "config");
    }

    #[test]
    fn only_native_windows_uses_scripts_layout() {
        assert!(OsKind::WindowsNative.uses_windows_layout());
        assert!(!OsKind::Wsl.uses_windows_layout());
        assert!(!OsKind::Linux.uses_windows_layout());
    }
}
