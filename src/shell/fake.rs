//! Scripted process runner for tests.

use super::command::{CommandResult, Invocation, ProcessRunner};
use crate::error::{HarmonizerError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Canned outcome for one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeResponse {
    /// Exit 0 with the given stdout.
    Success(String),
    /// Non-zero exit with the given stderr.
    Failure { code: i32, stderr: String },
    /// The call exceeds its timeout.
    Timeout,
    /// The program cannot be started.
    SpawnError(String),
}

impl FakeResponse {
    pub fn ok() -> Self {
        Self::Success(String::new())
    }

    pub fn fail(code: i32, stderr: impl Into<String>) -> Self {
        Self::Failure {
            code,
            stderr: stderr.into(),
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    responses: HashMap<String, FakeResponse>,
    effects: HashMap<String, Vec<(String, FakeResponse)>>,
    fallback: Option<FakeResponse>,
    calls: Vec<String>,
}

/// A [`ProcessRunner`] that answers from a script keyed by command line.
///
/// Effects let one command change later answers, e.g. a successful
/// `pip install requests` makes `pip show requests` succeed afterwards.
/// Unscripted commands get the fallback response, or a spawn error.
#[derive(Debug, Default)]
pub struct FakeRunner {
    state: Mutex<FakeState>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for `command_line`.
    pub fn respond(self, command_line: &str, response: FakeResponse) -> Self {
        self.set_response(command_line, response);
        self
    }

    /// After `command_line` succeeds, replace the response of `target`.
    pub fn on_success(self, command_line: &str, target: &str, response: FakeResponse) -> Self {
        self.lock()
            .effects
            .entry(command_line.to_string())
            .or_default()
            .push((target.to_string(), response));
        self
    }

    /// Response for commands with no script entry.
    pub fn fallback(self, response: FakeResponse) -> Self {
        self.lock().fallback = Some(response);
        self
    }

    pub fn set_response(&self, command_line: &str, response: FakeResponse) {
        self.lock()
            .responses
            .insert(command_line.to_string(), response);
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn was_called(&self, command_line: &str) -> bool {
        self.lock().calls.iter().any(|c| c == command_line)
    }

    /// Number of recorded calls whose command line contains `fragment`.
    pub fn count_calls(&self, fragment: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.contains(fragment))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let command_line = invocation.command_line();
        let mut state = self.lock();
        state.calls.push(command_line.clone());

        let response = state
            .responses
            .get(&command_line)
            .or(state.fallback.as_ref())
            .cloned()
            .unwrap_or_else(|| FakeResponse::SpawnError("no scripted response".to_string()));

        if matches!(response, FakeResponse::Success(_)) {
            if let Some(effects) = state.effects.get(&command_line).cloned() {
                for (target, next) in effects {
                    state.responses.insert(target, next);
                }
            }
        }

        match response {
            FakeResponse::Success(stdout) => {
                Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
            }
            FakeResponse::Failure { code, stderr } => Ok(CommandResult::failure(
                Some(code),
                String::new(),
                stderr,
                Duration::ZERO,
            )),
            FakeResponse::Timeout => Err(HarmonizerError::CommandTimedOut {
                command: command_line,
                timeout_secs: invocation.timeout.map(|t| t.as_secs_f64()).unwrap_or(0.0),
            }),
            FakeResponse::SpawnError(message) => Err(HarmonizerError::CommandSpawn {
                command: command_line,
                message,
            }),
        }
    }
}
