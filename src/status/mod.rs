//! The status snapshot produced by one scan.
//!
//! A [`Status`] is built once from the probe [`Facts`]; its issues are
//! derived at construction and it is read-only afterwards. Fixers take it by
//! reference and a re-scan is the only way to get a new one.

pub mod facts;
pub mod issue;
pub mod kinds;
pub mod rules;
pub mod version;

pub use facts::{
    ConfigFact, DependencyFact, DependencySource, DependencySourceKind, Facts, OsFact,
    PythonFact, RequiredVersion, VenvConflict, VenvFact,
};
pub use issue::Issue;
pub use kinds::{IssueCategory, IssueSeverity, OsKind, VenvKind};
pub use rules::{activation_command, derive_issues};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Snapshot of a project's environment at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    project_path: PathBuf,
    #[serde(flatten)]
    facts: Facts,
    issues: Vec<Issue>,
    scanned_at: DateTime<Utc>,
}

impl Status {
    /// Build a status, deriving its issues from `facts`.
    pub fn new(project_path: PathBuf, facts: Facts) -> Self {
        Self::at(project_path, facts, Utc::now())
    }

    /// Build a status with an explicit timestamp.
    pub fn at(project_path: PathBuf, facts: Facts, scanned_at: DateTime<Utc>) -> Self {
        let issues = derive_issues(&project_path, &facts);
        Self {
            project_path,
            facts,
            issues,
            scanned_at,
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    pub fn os(&self) -> Option<&OsFact> {
        self.facts.os.as_ref()
    }

    pub fn python(&self) -> Option<&PythonFact> {
        self.facts.python.as_ref()
    }

    pub fn venv(&self) -> Option<&VenvFact> {
        self.facts.venv.as_ref()
    }

    pub fn dependencies(&self) -> Option<&DependencyFact> {
        self.facts.dependencies.as_ref()
    }

    pub fn config_files(&self) -> Option<&ConfigFact> {
        self.facts.config_files.as_ref()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    /// Whether any issue has Error severity.
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    /// Highest severity present, if any.
    pub fn worst_severity(&self) -> Option<IssueSeverity> {
        self.issues.iter().map(|i| i.severity).max()
    }

    pub fn issues_in(&self, category: IssueCategory) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Whether at least one fixable issue of `category` exists.
    pub fn has_fixable(&self, category: IssueCategory) -> bool {
        self.issues_in(category).any(|i| i.fixable)
    }

    pub fn summary(&self) -> IssueSummary {
        let mut summary = IssueSummary::default();
        for issue in &self.issues {
            match issue.severity {
                IssueSeverity::Error => summary.errors += 1,
                IssueSeverity::Warning => summary.warnings += 1,
                IssueSeverity::Info => summary.info += 1,
            }
            if issue.fixable {
                summary.fixable += 1;
            }
        }
        summary
    }
}

/// Issue counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub fixable: usize,
}

/// Outcome of one attempted fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixResult {
    pub category: IssueCategory,
    pub success: bool,
    pub message: String,
    pub dry_run: bool,
}
