//! Typed facts reported by the probes.
//!
//! A `None` fact in [`Facts`] means the probe was not selected. A probe that
//! ran but could not determine a value still produces a fact, with its
//! unknown fields left empty.

use super::kinds::{OsKind, VenvKind};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Operating system facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsFact {
    pub kind: OsKind,
    /// Human-readable release, e.g. "Ubuntu 22.04.3 LTS".
    pub version: String,
    /// WSL generation (1 or 2) when running under WSL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wsl_version: Option<u8>,
}

/// A declared interpreter requirement and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredVersion {
    /// Requirement as written, e.g. ">=3.9".
    pub spec: String,
    /// File the requirement was read from.
    pub source: String,
}

/// Interpreter facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PythonFact {
    pub version: Option<String>,
    pub executable: Option<PathBuf>,
    pub required: Option<RequiredVersion>,
    /// Diagnostic note when the interpreter could not be queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A lower-priority detection method that found a different environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenvConflict {
    pub kind: VenvKind,
    pub path: PathBuf,
}

/// Virtual environment facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenvFact {
    pub kind: VenvKind,
    pub active: bool,
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<VenvConflict>,
}

impl VenvFact {
    pub fn none() -> Self {
        Self {
            kind: VenvKind::None,
            active: false,
            path: None,
            conflict: None,
        }
    }
}

/// Format of a dependency declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySourceKind {
    Requirements,
    Pyproject,
    SetupPy,
    Pipfile,
}

/// The file dependencies were declared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySource {
    pub path: PathBuf,
    pub kind: DependencySourceKind,
}

impl DependencySource {
    /// File name for messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Declared vs. installed dependency facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyFact {
    pub source: Option<DependencySource>,
    /// Normalized names in declaration order.
    pub declared: Vec<String>,
    pub missing: BTreeSet<String>,
    /// Packages whose installed check timed out or could not run.
    pub unknown: BTreeSet<String>,
    /// Read or parse error for the declared source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreadable: Option<String>,
}

/// Configuration-file presence facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigFact {
    pub found: BTreeSet<String>,
    pub missing_expected: BTreeSet<String>,
    /// Recommended `.gitignore` patterns not present. Empty when there is
    /// no `.gitignore`.
    pub gitignore_missing_patterns: Vec<String>,
    /// `.env` exists and `.gitignore` does not cover it.
    pub env_file_unignored: bool,
}

/// Everything the selected probes observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facts {
    pub os: Option<OsFact>,
    pub python: Option<PythonFact>,
    pub venv: Option<VenvFact>,
    pub dependencies: Option<DependencyFact>,
    pub config_files: Option<ConfigFact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_facts_are_null_in_json() {
        let facts = Facts {
            python: Some(PythonFact::default()),
            ..Default::default()
        };
        let json = serde_json::to_value(&facts).unwrap();
        assert!(json["os"].is_null());
        assert!(json["venv"].is_null());
        assert!(json["python"].is_object());
    }

    #[test]
    fn source_file_name() {
        let source = DependencySource {
            path: PathBuf::from("/proj/requirements.txt"),
            kind: DependencySourceKind::Requirements,
        };
        assert_eq!(source.file_name(), "requirements.txt");
    }

    #[test]
    fn venv_none_is_inactive() {
        let fact = VenvFact::none();
        assert_eq!(fact.kind, VenvKind::None);
        assert!(!fact.active);
        assert!(fact.path.is_none());
    }
}
