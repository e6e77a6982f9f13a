//! Environment probes.
//!
//! Each probe is a function of a [`ProbeContext`] returning a typed fact.
//! Probes never fail: missing files, subprocess errors and timeouts degrade
//! the fact (unknown fields, notes) and are logged.

pub mod config_files;
pub mod dependencies;
pub mod interpreter;
pub mod os;
pub mod python;
pub mod venv;

pub use interpreter::InterpreterInfo;

use crate::shell::ProcessRunner;
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable lookup, injectable for tests.
pub type EnvLookup = dyn Fn(&str) -> Result<String, VarError> + Send + Sync;

/// Default per-command timeout for probe subprocesses.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Interpreter command used when none is configured.
pub fn default_python() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Lookup against the real process environment.
pub fn process_env(key: &str) -> Result<String, VarError> {
    std::env::var(key)
}

/// Inputs shared by the probes of one scan.
///
/// The interpreter query is memoized here, so it runs at most once per scan
/// and is discarded with the context.
pub struct ProbeContext<'a> {
    pub project: &'a Path,
    pub runner: &'a dyn ProcessRunner,
    pub env: &'a EnvLookup,
    /// Interpreter command, e.g. `python3`.
    pub python: String,
    /// Budget for each probe subprocess.
    pub command_timeout: Duration,
    /// Root under which `proc/` and `etc/` are read.
    pub system_root: PathBuf,
    /// Platform family as in `std::env::consts::OS`.
    pub os_family: String,
    interpreter: OnceLock<Result<InterpreterInfo, String>>,
}

impl<'a> ProbeContext<'a> {
    pub fn new(project: &'a Path, runner: &'a dyn ProcessRunner, env: &'a EnvLookup) -> Self {
        Self {
            project,
            runner,
            env,
            python: default_python().to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            system_root: PathBuf::from("/"),
            os_family: std::env::consts::OS.to_string(),
            interpreter: OnceLock::new(),
        }
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

    /// Non-empty environment variable value.
    pub fn var(&self, key: &str) -> Option<String> {
        (self.env)(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Query the interpreter once per context.
    pub fn interpreter(&self) -> Result<&InterpreterInfo, &str> {
        self.interpreter
            .get_or_init(|| interpreter::query(self))
            .as_ref()
            .map_err(String::as_str)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    pub fn make_env(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<String, VarError> + Send + Sync {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
    }
}
