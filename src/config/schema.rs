//! Configuration schema.
//!
//! ```yaml
//! default_checks: [os, python, venv, dependencies, config]
//! fix_confirmation_required: true
//! dependency_check_timeout_seconds: 5
//! python: python3.11
//! ```

use crate::probes::DEFAULT_COMMAND_TIMEOUT;
use crate::scanner::{CheckKind, CheckSelection};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Persisted options for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarmonizerConfig {
    /// Checks to run when none are given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_checks: Option<Vec<CheckKind>>,

    /// Ask before each mutating fix.
    pub fix_confirmation_required: bool,

    /// Budget for each installed-package check.
    pub dependency_check_timeout_seconds: f64,

    /// Interpreter command; defaults to `python3` (`python` on Windows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self {
            default_checks: None,
            fix_confirmation_required: true,
            dependency_check_timeout_seconds: DEFAULT_COMMAND_TIMEOUT.as_secs_f64(),
            python: None,
        }
    }
}

impl HarmonizerConfig {
    /// Per-check timeout; falls back to the default for invalid values.
    pub fn dependency_check_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.dependency_check_timeout_seconds)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT)
    }

    /// Checks to run when the caller selected none.
    pub fn default_selection(&self) -> CheckSelection {
        match &self.default_checks {
            Some(kinds) => CheckSelection::only(kinds.iter().copied()),
            None => CheckSelection::all(),
        }
    }
}

/// Contents written by `harmonizer init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = "\
# Harmonizer configuration

# Checks run by `harmonizer scan` when --check/--skip are not given.
# default_checks: [os, python, venv, dependencies, config]

# Ask before each mutating fix (same as always passing --yes when false).
fix_confirmation_required: true

# Seconds allowed for each installed-package check.
dependency_check_timeout_seconds: 5

# Interpreter to inspect and use for fixes.
# python: python3
";
