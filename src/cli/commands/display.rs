//! Rendering of status snapshots and fix results.
//!
//! Text and JSON are both derived from a finished [`Status`]; neither
//! rendering triggers any probing.

use serde::Serialize;

use crate::error::{HarmonizerError, Result};
use crate::probes::config_files::CATALOGUE;
use crate::status::{FixResult, IssueSummary, Status, VenvKind};
use crate::ui::HarmonizerTheme;

const LABEL_WIDTH: usize = 14;

/// JSON document for `scan --json`.
#[derive(Serialize)]
struct StatusReport<'a> {
    #[serde(flatten)]
    status: &'a Status,
    summary: IssueSummary,
}

/// Pretty JSON for a status, with summary counts.
pub fn status_json(status: &Status) -> Result<String> {
    let report = StatusReport {
        status,
        summary: status.summary(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| HarmonizerError::Other(e.into()))
}

/// "1 error, 2 warnings, 0 info (2 fixable)".
pub fn summary_line(summary: &IssueSummary) -> String {
    format!(
        "{} {}, {} {}, {} info ({} fixable)",
        summary.errors,
        plural(summary.errors, "error", "errors"),
        summary.warnings,
        plural(summary.warnings, "warning", "warnings"),
        summary.info,
        summary.fixable
    )
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Human-readable report. `verbose` adds fix hints and the scan time.
pub fn render_status(status: &Status, theme: &HarmonizerTheme, verbose: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        theme.key.apply_to(format!("{:<w$}", "Project", w = LABEL_WIDTH)),
        status.project_path().display()
    )];
    if verbose {
        lines.push(format!(
            "{} {}",
            theme.key.apply_to(format!("{:<w$}", "Scanned", w = LABEL_WIDTH)),
            status.scanned_at().format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    for (label, value) in fact_lines(status) {
        lines.push(format!(
            "{} {}",
            theme.key.apply_to(format!("{:<w$}", label, w = LABEL_WIDTH)),
            value
        ));
    }
    lines.push(String::new());

    if status.issues().is_empty() {
        lines.push(theme.format_success("No issues found"));
        return lines.join("\n");
    }

    lines.push(format!("{}", theme.highlight.apply_to("Issues:")));
    for issue in status.issues() {
        let text = format!("[{}] {}", issue.category, issue.message);
        lines.push(format!("  {}", theme.format_issue(issue.severity, &text)));
        if let Some(hint) = &issue.fix_hint {
            if verbose || issue.fixable {
                lines.push(format!("      {}", theme.hint.apply_to(format!("→ {}", hint))));
            }
        }
    }
    lines.push(String::new());
    lines.push(summary_line(&status.summary()));

    lines.join("\n")
}

/// Label/value pairs for every fact the scan collected.
fn fact_lines(status: &Status) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();

    if let Some(os) = status.os() {
        let mut value = format!("{} ({})", os.kind, os.version);
        if let Some(generation) = os.wsl_version {
            value.push_str(&format!(", WSL {}", generation));
        }
        out.push(("OS", value));
    }

    if let Some(python) = status.python() {
        let mut value = match (&python.version, &python.executable) {
            (Some(v), Some(exe)) => format!("{} ({})", v, exe.display()),
            (Some(v), None) => v.clone(),
            _ => "unknown".to_string(),
        };
        if let Some(required) = &python.required {
            value.push_str(&format!(", requires {} (from {})", required.spec, required.source));
        }
        out.push(("Python", value));
    }

    if let Some(venv) = status.venv() {
        let value = match (venv.kind, &venv.path) {
            (VenvKind::None, _) => "none".to_string(),
            (kind, Some(path)) => format!(
                "{} at {} ({})",
                kind,
                path.display(),
                if venv.active { "active" } else { "inactive" }
            ),
            (kind, None) => format!("{} ({})", kind, if venv.active { "active" } else { "inactive" }),
        };
        out.push(("Environment", value));
    }

    if let Some(deps) = status.dependencies() {
        let value = match (&deps.source, &deps.unreadable) {
            (Some(source), Some(_)) => format!("{} unreadable", source.file_name()),
            (Some(source), None) => format!(
                "{} declared in {}, {} missing",
                deps.declared.len(),
                source.file_name(),
                deps.missing.len()
            ),
            (None, _) => "no dependency file".to_string(),
        };
        out.push(("Dependencies", value));
    }

    if let Some(config) = status.config_files() {
        out.push((
            "Config files",
            format!("{} of {} catalogued files present", config.found.len(), CATALOGUE.len()),
        ));
    }

    out
}

/// One line per fix result.
pub fn render_fix_result(result: &FixResult, theme: &HarmonizerTheme) -> String {
    let text = format!("[{}] {}", result.category, result.message);
    if result.dry_run {
        format!("{} {}", theme.dim.apply_to("•"), text)
    } else if result.success {
        theme.format_success(&text)
    } else {
        theme.format_error(&text)
    }
}
