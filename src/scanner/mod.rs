//! Scan orchestration.
//!
//! A [`Scanner`] is bound to one existing project directory. Each scan runs
//! the selected probes concurrently, one thread and one result slot per
//! probe, and assembles a fresh [`Status`].

mod checks;

pub use checks::{CheckKind, CheckSelection};

use crate::config::HarmonizerConfig;
use crate::error::{HarmonizerError, Result};
use crate::probes::{self, EnvLookup, ProbeContext};
use crate::shell::{CancelFlag, ProcessRunner, SystemRunner};
use crate::status::{
    ConfigFact, DependencyFact, Facts, OsFact, OsKind, PythonFact, Status, VenvFact,
};
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;

/// Runs probes against one project directory.
pub struct Scanner {
    project: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    env: Arc<EnvLookup>,
    python: String,
    command_timeout: Duration,
    system_root: PathBuf,
    os_family: String,
}

impl Scanner {
    /// Bind a scanner to `project_path`.
    ///
    /// Fails if the path does not exist or is not a directory.
    pub fn new(project_path: impl AsRef<Path>) -> Result<Self> {
        let project = resolve_project(project_path.as_ref())?;
        Ok(Self {
            project,
            runner: Arc::new(SystemRunner),
            env: Arc::new(probes::process_env),
            python: probes::default_python().to_string(),
            command_timeout: probes::DEFAULT_COMMAND_TIMEOUT,
            system_root: PathBuf::from("/"),
            os_family: std::env::consts::OS.to_string(),
        })
    }

    /// Apply interpreter and timeout settings from a config.
    pub fn configure(mut self, config: &HarmonizerConfig) -> Self {
        if let Some(python) = &config.python {
            self.python = python.clone();
        }
        self.command_timeout = config.dependency_check_timeout();
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, VarError> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_system_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.system_root = root.into();
        self
    }

    pub fn with_os_family(mut self, family: impl Into<String>) -> Self {
        self.os_family = family.into();
        self
    }

    /// Canonical project directory.
    pub fn project_path(&self) -> &Path {
        &self.project
    }

    pub fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    /// Run the selected probes.
    pub fn scan(&self, checks: &CheckSelection) -> Status {
        let facts = self.collect(checks, &CancelFlag::new());
        Status::new(self.project.clone(), facts)
    }

    /// Run the selected probes, stopping before any probe that has not
    /// started once `cancel` is set.
    pub fn scan_with_cancel(&self, checks: &CheckSelection, cancel: &CancelFlag) -> Result<Status> {
        let facts = self.collect(checks, cancel);
        if cancel.is_cancelled() {
            tracing::info!("Scan cancelled");
            return Err(HarmonizerError::Cancelled);
        }
        Ok(Status::new(self.project.clone(), facts))
    }

    fn context(&self) -> ProbeContext<'_> {
        ProbeContext::new(&self.project, self.runner.as_ref(), self.env.as_ref())
            .with_python(self.python.clone())
            .with_command_timeout(self.command_timeout)
            .with_system_root(self.system_root.clone())
            .with_os_family(self.os_family.clone())
    }

    fn collect(&self, checks: &CheckSelection, cancel: &CancelFlag) -> Facts {
        tracing::debug!("Scanning {} ({})", self.project.display(), checks);
        let ctx = self.context();
        let ctx = &ctx;

        thread::scope(|s| {
            let os = spawn_probe(s, checks, CheckKind::Os, cancel, move || probes::os::probe(ctx));
            let python = spawn_probe(s, checks, CheckKind::Python, cancel, move || {
                probes::python::probe(ctx)
            });
            let venv = spawn_probe(s, checks, CheckKind::Venv, cancel, move || {
                probes::venv::probe(ctx)
            });
            let dependencies = spawn_probe(s, checks, CheckKind::Dependencies, cancel, move || {
                probes::dependencies::probe(ctx)
            });
            let config_files = spawn_probe(s, checks, CheckKind::Config, cancel, move || {
                probes::config_files::probe(ctx)
            });

            Facts {
                os: join_probe(os, CheckKind::Os, || OsFact {
                    kind: OsKind::Unknown,
                    version: String::new(),
                    wsl_version: None,
                }),
                python: join_probe(python, CheckKind::Python, || PythonFact {
                    note: Some("interpreter probe failed".to_string()),
                    ..Default::default()
                }),
                venv: join_probe(venv, CheckKind::Venv, VenvFact::none),
                dependencies: join_probe(dependencies, CheckKind::Dependencies, || {
                    DependencyFact {
                        unreadable: Some("dependency probe failed".to_string()),
                        ..Default::default()
                    }
                }),
                config_files: join_probe(config_files, CheckKind::Config, ConfigFact::default),
            }
        })
    }
}

fn spawn_probe<'scope, 'env, T, F>(
    scope: &'scope Scope<'scope, 'env>,
    checks: &CheckSelection,
    kind: CheckKind,
    cancel: &CancelFlag,
    probe: F,
) -> Option<ScopedJoinHandle<'scope, T>>
where
    T: Send + 'scope,
    F: FnOnce() -> T + Send + 'scope,
{
    if !checks.contains(kind) {
        return None;
    }
    if cancel.is_cancelled() {
        tracing::debug!("Skipping {} probe: cancelled", kind);
        return None;
    }
    Some(scope.spawn(probe))
}

/// Probes do not panic; if one does, its fact is degraded rather than lost.
fn join_probe<T>(
    handle: Option<ScopedJoinHandle<'_, T>>,
    kind: CheckKind,
    degraded: impl FnOnce() -> T,
) -> Option<T> {
    let handle = handle?;
    match handle.join() {
        Ok(fact) => Some(fact),
        Err(_) => {
            tracing::error!("{} probe panicked", kind);
            Some(degraded())
        }
    }
}

fn resolve_project(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(HarmonizerError::ProjectNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(HarmonizerError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    path.canonicalize()
        .map_err(|_| HarmonizerError::ProjectNotFound {
            path: path.to_path_buf(),
        })
}

/// Scan `project_path` with the system runner and process environment.
///
/// `None` runs every check.
pub fn scan(project_path: impl AsRef<Path>, checks: Option<&CheckSelection>) -> Result<Status> {
    let scanner = Scanner::new(project_path)?;
    let all = CheckSelection::all();
    Ok(scanner.scan(checks.unwrap_or(&all)))
}
