//! Derived diagnostic records.

use super::kinds::{IssueCategory, IssueSeverity};
use serde::Serialize;

/// A detected inconsistency in the environment.
///
/// Issues are only created by [`derive_issues`](super::derive_issues) from
/// the facts of one status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub message: String,
    /// Whether a fixer can act on this issue.
    pub fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
}

impl Issue {
    pub(crate) fn new(
        severity: IssueSeverity,
        category: IssueCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            fixable: false,
            fix_hint: None,
        }
    }

    pub(crate) fn error(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Error, category, message)
    }

    pub(crate) fn warning(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Warning, category, message)
    }

    pub(crate) fn info(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Info, category, message)
    }

    /// Mark as fixable with a hint describing the fix.
    pub(crate) fn with_fix(mut self, hint: impl Into<String>) -> Self {
        self.fixable = true;
        self.fix_hint = Some(hint.into());
        self
    }

    /// Attach a manual remedy without marking the issue fixable.
    pub(crate) fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}
