//! Installs missing packages with pip.

use super::{FixAction, Fixer, PlannedFix};
use crate::shell::{Invocation, ProcessRunner};
use crate::status::{IssueCategory, Status};
use std::sync::Arc;
use std::time::Duration;

/// Time allowed for a single `pip install`.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// `python -m pip install <name>`.
pub fn install_invocation(python: &str, name: &str) -> Invocation {
    Invocation::new(python).args(["-m", "pip", "install", name])
}

/// One install per missing package, in name order.
pub struct DependencyFixer {
    runner: Arc<dyn ProcessRunner>,
    python: String,
    timeout: Duration,
}

impl DependencyFixer {
    pub fn new(runner: Arc<dyn ProcessRunner>, python: impl Into<String>) -> Self {
        Self {
            runner,
            python: python.into(),
            timeout: INSTALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Fixer for DependencyFixer {
    fn category(&self) -> IssueCategory {
        IssueCategory::Dependency
    }

    fn plan(&self, status: &Status) -> Vec<PlannedFix> {
        let Some(deps) = status.dependencies() else {
            return Vec::new();
        };
        deps.missing
            .iter()
            .map(|name| {
                PlannedFix::mutating(
                    format!("Install {}", name),
                    FixAction::InstallPackage(name.clone()),
                )
            })
            .collect()
    }

    fn perform(&self, status: &Status, fix: &PlannedFix) -> Result<(), String> {
        let FixAction::InstallPackage(name) = &fix.action else {
            return Ok(());
        };

        let invocation = install_invocation(&self.python, name)
            .current_dir(status.project_path())
            .timeout(self.timeout);
        tracing::debug!("Running: {}", invocation.command_line());

        let result = self.runner.run(&invocation).map_err(|e| e.to_string())?;
        if result.success {
            Ok(())
        } else {
            let detail = result
                .first_error_line()
                .map(str::to_string)
                .unwrap_or_else(|| match result.exit_code {
                    Some(code) => format!("exit code {}", code),
                    None => "terminated by signal".to_string(),
                });
            Err(detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::FixOptions;
    use crate::shell::{FakeResponse, FakeRunner};
    use crate::status::{DependencyFact, DependencySource, DependencySourceKind, Facts};
    use std::path::PathBuf;

    fn status_missing(names: &[&str]) -> Status {
        let facts = Facts {
            dependencies: Some(DependencyFact {
                source: Some(DependencySource {
                    path: PathBuf::from("/proj/requirements.txt"),
                    kind: DependencySourceKind::Requirements,
                }),
                declared: names.iter().map(|s| s.to_string()).collect(),
                missing: names.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }),
            ..Default::default()
        };
        Status::new(PathBuf::from("/proj"), facts)
    }

    fn auto() -> FixOptions {
        FixOptions {
            dry_run: false,
            auto_confirm: true,
        }
    }

    #[test]
    fn plans_one_install_per_missing_package() {
        let fixer = DependencyFixer::new(Arc::new(FakeRunner::new()), "python3");
        let plan = fixer.plan(&status_missing(&["requests", "click"]));
        let descriptions: Vec<_> = plan.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(descriptions, ["Install click", "Install requests"]);
        assert!(plan.iter().all(|f| f.mutating));
    }

    #[test]
    fn installs_with_pip() {
        let runner = Arc::new(
            FakeRunner::new().respond("python3 -m pip install requests", FakeResponse::ok()),
        );
        let fixer = DependencyFixer::new(runner.clone(), "python3");
        let results = fixer.apply(&status_missing(&["requests"]), auto(), &mut |_: &str| false);

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].message, "Install requests");
        assert!(runner.was_called("python3 -m pip install requests"));
    }

    #[test]
    fn pip_failure_reports_stderr() {
        let runner = Arc::new(FakeRunner::new().respond(
            "python3 -m pip install nosuchpkg",
            FakeResponse::fail(1, "ERROR: No matching distribution found for nosuchpkg\n"),
        ));
        let fixer = DependencyFixer::new(runner, "python3");
        let results = fixer.apply(&status_missing(&["nosuchpkg"]), auto(), &mut |_: &str| false);

        assert!(!results[0].success);
        assert!(results[0].message.contains("No matching distribution"));
    }

    #[test]
    fn pip_timeout_is_failure() {
        let runner = Arc::new(
            FakeRunner::new().respond("python3 -m pip install slowpkg", FakeResponse::Timeout),
        );
        let fixer = DependencyFixer::new(runner, "python3").with_timeout(Duration::from_secs(1));
        let results = fixer.apply(&status_missing(&["slowpkg"]), auto(), &mut |_: &str| false);

        assert!(!results[0].success);
        assert!(results[0].message.contains("timed out"));
    }

    #[test]
    fn dry_run_runs_nothing() {
        let runner = Arc::new(FakeRunner::new());
        let fixer = DependencyFixer::new(runner.clone(), "python3");
        let options = FixOptions {
            dry_run: true,
            auto_confirm: false,
        };
        let results = fixer.apply(&status_missing(&["requests", "click"]), options, &mut |_: &str| {
            false
        });

        assert_eq!(results.len(), 2);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn no_dependency_fact_means_no_work() {
        let fixer = DependencyFixer::new(Arc::new(FakeRunner::new()), "python3");
        let status = Status::new(PathBuf::from("/proj"), Facts::default());
        assert!(!fixer.can_fix(&status));
        assert!(fixer.plan(&status).is_empty());
    }
}
