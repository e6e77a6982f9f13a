//! Querying the project's Python interpreter.

use super::ProbeContext;
use crate::shell::Invocation;
use std::path::PathBuf;

const QUERY_SCRIPT: &str = "import sys; print(sys.version.split()[0]); print(sys.executable); \
print(sys.prefix); print(getattr(sys, 'base_prefix', sys.prefix))";

/// What the interpreter reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterInfo {
    pub version: String,
    pub executable: PathBuf,
    pub prefix: PathBuf,
    pub base_prefix: PathBuf,
}

impl InterpreterInfo {
    /// Running inside a virtual environment (`sys.prefix != sys.base_prefix`).
    pub fn in_virtual_env(&self) -> bool {
        self.prefix != self.base_prefix
    }
}

/// The invocation used to query `python`.
pub fn query_invocation(python: &str) -> Invocation {
    Invocation::new(python).args(["-c", QUERY_SCRIPT])
}

/// Command line of [`query_invocation`], for scripting fake runners.
pub fn query_command_line(python: &str) -> String {
    query_invocation(python).command_line()
}

pub(crate) fn query(ctx: &ProbeContext<'_>) -> Result<InterpreterInfo, String> {
    let invocation = query_invocation(&ctx.python)
        .current_dir(ctx.project)
        .timeout(ctx.command_timeout);

    let result = ctx.runner.run(&invocation).map_err(|e| {
        tracing::warn!("Interpreter query failed: {}", e);
        e.to_string()
    })?;

    if !result.success {
        let reason = result
            .first_error_line()
            .unwrap_or("no output")
            .to_string();
        tracing::warn!("{} exited with {:?}: {}", ctx.python, result.exit_code, reason);
        return Err(format!("{} failed: {}", ctx.python, reason));
    }

    parse_output(&result.stdout).ok_or_else(|| {
        tracing::warn!("Unexpected interpreter output: {:?}", result.stdout);
        format!("{} returned unexpected output", ctx.python)
    })
}

fn parse_output(stdout: &str) -> Option<InterpreterInfo> {
    let mut lines = stdout.lines().map(str::trim);
    let version = lines.next().filter(|v| !v.is_empty())?.to_string();
    let executable = PathBuf::from(lines.next()?);
    let prefix = PathBuf::from(lines.next()?);
    let base_prefix = lines
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| prefix.clone());
    Some(InterpreterInfo {
        version,
        executable,
        prefix,
        base_prefix,
    })
}
