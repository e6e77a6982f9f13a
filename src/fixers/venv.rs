//! Creates a virtual environment or explains how to activate one.

use super::{FixAction, Fixer, PlannedFix};
use crate::probes::venv::has_environment_marker;
use crate::shell::{Invocation, ProcessRunner};
use crate::status::{activation_command, IssueCategory, OsKind, Status, VenvKind};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Directory created inside the project.
pub const DEFAULT_VENV_DIR: &str = ".venv";

const CREATE_TIMEOUT: Duration = Duration::from_secs(120);

/// `python -m venv <path>`.
pub fn create_invocation(python: &str, path: &Path) -> Invocation {
    Invocation::new(python).args(["-m".to_string(), "venv".to_string(), path.display().to_string()])
}

pub struct VenvFixer {
    runner: Arc<dyn ProcessRunner>,
    python: String,
}

impl VenvFixer {
    pub fn new(runner: Arc<dyn ProcessRunner>, python: impl Into<String>) -> Self {
        Self {
            runner,
            python: python.into(),
        }
    }
}

impl Fixer for VenvFixer {
    fn category(&self) -> IssueCategory {
        IssueCategory::Venv
    }

    fn plan(&self, status: &Status) -> Vec<PlannedFix> {
        let Some(venv) = status.venv() else {
            return Vec::new();
        };

        match (venv.kind, venv.active, &venv.path) {
            (VenvKind::None, _, _) => {
                let path = status.project_path().join(DEFAULT_VENV_DIR);
                vec![PlannedFix::mutating(
                    format!("Create virtual environment at {}", path.display()),
                    FixAction::CreateVenv(path),
                )]
            }
            (kind, false, Some(path)) => {
                // Activation belongs to the user's shell; report the command.
                let os = status.os().map(|o| o.kind).unwrap_or_else(OsKind::host);
                vec![PlannedFix::advisory(format!(
                    "Activate the {} environment with: {}",
                    kind,
                    activation_command(os, kind, path)
                ))]
            }
            _ => Vec::new(),
        }
    }

    fn perform(&self, status: &Status, fix: &PlannedFix) -> Result<(), String> {
        let FixAction::CreateVenv(path) = &fix.action else {
            return Ok(());
        };

        if has_environment_marker(path) {
            tracing::debug!("Environment already present at {}", path.display());
            return Ok(());
        }

        let invocation = create_invocation(&self.python, path)
            .current_dir(status.project_path())
            .timeout(CREATE_TIMEOUT);
        let result = self.runner.run(&invocation).map_err(|e| e.to_string())?;
        if result.success {
            Ok(())
        } else {
            Err(result
                .first_error_line()
                .unwrap_or("venv creation failed")
                .to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::FixOptions;
    use crate::shell::{FakeResponse, FakeRunner};
    use crate::status::{Facts, OsFact, VenvFact};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn status_with(project: &Path, venv: VenvFact) -> Status {
        let facts = Facts {
            os: Some(OsFact {
                kind: OsKind::Linux,
                version: "Ubuntu 22.04".into(),
                wsl_version: None,
            }),
            venv: Some(venv),
            ..Default::default()
        };
        Status::new(project.to_path_buf(), facts)
    }

    fn auto() -> FixOptions {
        FixOptions {
            dry_run: false,
            auto_confirm: true,
        }
    }

    #[test]
    fn creates_venv_when_missing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".venv");
        let cmd = create_invocation("python3", &target).command_line();
        let runner = Arc::new(FakeRunner::new().respond(&cmd, FakeResponse::ok()));
        let fixer = VenvFixer::new(runner.clone(), "python3");

        let results = fixer.apply(&status_with(temp.path(), VenvFact::none()), auto(), &mut |_: &str| {
            false
        });

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert!(results[0].message.starts_with("Create virtual environment at"));
        assert!(runner.was_called(&cmd));
    }

    #[test]
    fn existing_environment_makes_create_a_no_op() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".venv");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        let runner = Arc::new(FakeRunner::new());
        let fixer = VenvFixer::new(runner.clone(), "python3");

        let results = fixer.apply(&status_with(temp.path(), VenvFact::none()), auto(), &mut |_: &str| {
            false
        });

        assert!(results[0].success);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn inactive_venv_reports_activation_without_confirmation() {
        let venv = VenvFact {
            kind: VenvKind::Virtualenv,
            active: false,
            path: Some(PathBuf::from("/proj/.venv")),
            conflict: None,
        };
        let runner = Arc::new(FakeRunner::new());
        let fixer = VenvFixer::new(runner.clone(), "python3");
        let mut asked = false;
        let results = fixer.apply(
            &status_with(Path::new("/proj"), venv),
            FixOptions::default(),
            &mut |_: &str| {
                asked = true;
                false
            },
        );

        assert!(!asked);
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert!(results[0].message.contains("source /proj/.venv/bin/activate"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn active_venv_needs_nothing() {
        let venv = VenvFact {
            kind: VenvKind::Conda,
            active: true,
            path: Some(PathBuf::from("/opt/conda/envs/app")),
            conflict: None,
        };
        let fixer = VenvFixer::new(Arc::new(FakeRunner::new()), "python3");
        let status = status_with(Path::new("/proj"), venv);
        assert!(!fixer.can_fix(&status));
        assert!(fixer.plan(&status).is_empty());
    }

    #[test]
    fn creation_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".venv");
        let cmd = create_invocation("python3", &target).command_line();
        let runner = Arc::new(
            FakeRunner::new().respond(&cmd, FakeResponse::fail(1, "Error: ensurepip is not available\n")),
        );
        let fixer = VenvFixer::new(runner, "python3");
        let results = fixer.apply(&status_with(temp.path(), VenvFact::none()), auto(), &mut |_: &str| {
            false
        });

        assert!(!results[0].success);
        assert!(results[0].message.contains("ensurepip"));
    }
}
