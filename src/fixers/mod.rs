//! Environment fixers.
//!
//! Each [`Fixer`] owns one issue category. Fixers read a [`Status`] and never
//! modify it; a re-scan shows their effect.
//!
//! Every fixer shares one decision path in [`Fixer::apply_with_cancel`]:
//! plan the fixes from the status, then for each planned fix either report a
//! preview (dry run), ask for confirmation, or perform it. A dry run walks
//! exactly the same plan as a real run, so its results line up one-to-one.

pub mod config;
pub mod confirm;
pub mod dependency;
pub mod venv;

pub use config::ConfigFixer;
pub use confirm::{Confirm, UiConfirm};
pub use dependency::DependencyFixer;
pub use venv::VenvFixer;

use crate::shell::{CancelFlag, ProcessRunner};
use crate::status::{FixResult, IssueCategory, Status};
use std::path::PathBuf;
use std::sync::Arc;

/// How fixes are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixOptions {
    /// Report what would be done without doing it.
    pub dry_run: bool,
    /// Skip per-fix confirmation.
    pub auto_confirm: bool,
}

/// A concrete step a fixer intends to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixAction {
    InstallPackage(String),
    CreateVenv(PathBuf),
    /// Report activation instructions; nothing is changed.
    ShowActivation,
    CreateGitignore,
    AppendGitignore(Vec<String>),
}

/// One planned fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFix {
    pub description: String,
    /// Whether performing the fix changes the environment.
    pub mutating: bool,
    pub action: FixAction,
}

impl PlannedFix {
    pub fn mutating(description: impl Into<String>, action: FixAction) -> Self {
        Self {
            description: description.into(),
            mutating: true,
            action,
        }
    }

    pub fn advisory(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            mutating: false,
            action: FixAction::ShowActivation,
        }
    }
}

/// Resolves the issues of one category.
pub trait Fixer {
    /// The category this fixer owns.
    fn category(&self) -> IssueCategory;

    /// Fixes this fixer would attempt for `status`, in order.
    fn plan(&self, status: &Status) -> Vec<PlannedFix>;

    /// Carry out one planned fix. Must be a no-op success when the fix is
    /// already in place.
    fn perform(&self, status: &Status, fix: &PlannedFix) -> Result<(), String>;

    /// Whether at least one fixable issue of this category exists.
    fn can_fix(&self, status: &Status) -> bool {
        status.has_fixable(self.category())
    }

    fn apply(&self, status: &Status, options: FixOptions, confirm: &mut dyn Confirm) -> Vec<FixResult> {
        self.apply_with_cancel(status, options, confirm, &CancelFlag::new())
    }

    /// Apply planned fixes, stopping before the next fix once cancelled.
    fn apply_with_cancel(
        &self,
        status: &Status,
        options: FixOptions,
        confirm: &mut dyn Confirm,
        cancel: &CancelFlag,
    ) -> Vec<FixResult> {
        if !self.can_fix(status) {
            return Vec::new();
        }

        let category = self.category();
        let mut results = Vec::new();

        for fix in self.plan(status) {
            if cancel.is_cancelled() {
                tracing::info!("Fixes cancelled before: {}", fix.description);
                break;
            }

            let result = |success: bool, message: String| FixResult {
                category,
                success,
                message,
                dry_run: options.dry_run,
            };

            if options.dry_run {
                results.push(result(true, format!("{} (preview)", fix.description)));
                continue;
            }

            if fix.mutating && !options.auto_confirm && !confirm.confirm(&fix.description) {
                results.push(result(
                    false,
                    format!("{}: skipped (not confirmed)", fix.description),
                ));
                continue;
            }

            match self.perform(status, &fix) {
                Ok(()) => {
                    if fix.mutating {
                        tracing::info!("Applied: {}", fix.description);
                    }
                    results.push(result(true, fix.description));
                }
                Err(e) => {
                    tracing::warn!("Fix failed: {}: {}", fix.description, e);
                    results.push(result(false, format!("{}: failed - {}", fix.description, e)));
                }
            }
        }

        results
    }
}

/// Runs fixers one after another.
///
/// Fixers mutate shared on-disk and interpreter state, so a session never
/// runs two fixes at once and must not overlap a scan of the same project.
pub struct FixSession {
    fixers: Vec<Box<dyn Fixer>>,
}

impl FixSession {
    pub fn new(fixers: Vec<Box<dyn Fixer>>) -> Self {
        Self { fixers }
    }

    /// The venv, dependency and config fixers, in that order.
    pub fn standard(runner: Arc<dyn ProcessRunner>, python: &str) -> Self {
        Self::new(vec![
            Box::new(VenvFixer::new(Arc::clone(&runner), python)),
            Box::new(DependencyFixer::new(runner, python)),
            Box::new(ConfigFixer::new()),
        ])
    }

    /// Keep only fixers for `categories`.
    pub fn only(mut self, categories: &[IssueCategory]) -> Self {
        self.fixers.retain(|f| categories.contains(&f.category()));
        self
    }

    pub fn categories(&self) -> Vec<IssueCategory> {
        self.fixers.iter().map(|f| f.category()).collect()
    }

    /// Whether any fixer has work to do.
    pub fn has_work(&self, status: &Status) -> bool {
        self.fixers.iter().any(|f| f.can_fix(status))
    }

    /// Apply every fixer in order. Results completed before a cancellation
    /// are returned.
    pub fn run(
        &self,
        status: &Status,
        options: FixOptions,
        confirm: &mut dyn Confirm,
        cancel: &CancelFlag,
    ) -> Vec<FixResult> {
        let mut results = Vec::new();
        for fixer in &self.fixers {
            if cancel.is_cancelled() {
                break;
            }
            results.extend(fixer.apply_with_cancel(status, options, confirm, cancel));
        }
        results
    }
}
