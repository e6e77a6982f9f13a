//! The issue rule table.
//!
//! Derivation is a pure function of the project path and the facts. Issues
//! come out grouped by category (os, python, venv, dependency, config) and
//! in rule order within a category.

use super::facts::{ConfigFact, DependencyFact, Facts, OsFact, PythonFact, VenvFact};
use super::issue::Issue;
use super::kinds::{IssueCategory, OsKind, VenvKind};
use super::version::{check_compatibility, Compatibility};
use std::path::Path;

const WINDOWS_PATH_LIMIT: usize = 200;

/// Derive every issue supported by `facts`.
pub fn derive_issues(project_path: &Path, facts: &Facts) -> Vec<Issue> {
    let mut issues = Vec::new();
    if let Some(os) = &facts.os {
        os_issues(project_path, os, &mut issues);
    }
    if let Some(python) = &facts.python {
        python_issues(python, &mut issues);
    }
    if let Some(venv) = &facts.venv {
        let os = facts.os.as_ref().map(|o| o.kind).unwrap_or_else(OsKind::host);
        venv_issues(venv, os, &mut issues);
    }
    if let Some(deps) = &facts.dependencies {
        dependency_issues(deps, &mut issues);
    }
    if let Some(config) = &facts.config_files {
        config_issues(config, &mut issues);
    }
    issues
}

/// Command that activates an environment, for hints and fix messages.
pub fn activation_command(os: OsKind, kind: VenvKind, path: &Path) -> String {
    match kind {
        VenvKind::Conda => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("conda activate {}", name)
        }
        VenvKind::Pipenv => "pipenv shell".to_string(),
        VenvKind::Poetry => "poetry shell".to_string(),
        VenvKind::Virtualenv | VenvKind::None => {
            if os.uses_windows_layout() {
                format!("{}\\Scripts\\activate.bat", path.display())
            } else {
                format!("source {}/bin/activate", path.display())
            }
        }
    }
}

fn os_issues(project_path: &Path, os: &OsFact, issues: &mut Vec<Issue>) {
    let path = project_path.to_string_lossy();

    if os.kind == OsKind::Unknown {
        issues.push(Issue::info(
            IssueCategory::Os,
            "Could not determine the operating system",
        ));
    }

    if os.kind == OsKind::Wsl {
        if let Some(drive) = windows_mount_drive(&path) {
            issues.push(
                Issue::warning(
                    IssueCategory::Os,
                    format!(
                        "Project is on the Windows filesystem (/mnt/{}); file access from WSL is slow",
                        drive
                    ),
                )
                .with_hint("Move the project into the Linux filesystem, e.g. ~/projects"),
            );
        }
    }

    if os.kind == OsKind::WindowsNative && path.chars().count() > WINDOWS_PATH_LIMIT {
        issues.push(
            Issue::warning(
                IssueCategory::Os,
                format!(
                    "Project path is {} characters long; Windows tools may fail past 260",
                    path.chars().count()
                ),
            )
            .with_hint("Move the project closer to the drive root or enable long paths"),
        );
    }

    if path.contains(' ') {
        issues.push(Issue::info(
            IssueCategory::Os,
            "Project path contains spaces; some build tools mishandle them",
        ));
    }

    if !path.is_ascii() {
        issues.push(Issue::warning(
            IssueCategory::Os,
            "Project path contains non-ASCII characters",
        ));
    }
}

/// `/mnt/c/...` → `Some('c')`.
fn windows_mount_drive(path: &str) -> Option<char> {
    let rest = path.strip_prefix("/mnt/")?;
    let mut chars = rest.chars();
    let drive = chars.next()?;
    match chars.next() {
        None | Some('/') if drive.is_ascii_alphabetic() => Some(drive),
        _ => None,
    }
}

fn python_issues(python: &PythonFact, issues: &mut Vec<Issue>) {
    let Some(current) = &python.version else {
        let mut message = "Could not determine the Python interpreter version".to_string();
        if let Some(note) = &python.note {
            message.push_str(&format!(" ({})", note));
        }
        issues.push(Issue::warning(IssueCategory::Python, message));
        return;
    };

    let Some(required) = &python.required else {
        return;
    };

    match check_compatibility(current, &required.spec) {
        Compatibility::Satisfied => {}
        Compatibility::TooOld { required: wanted } => issues.push(
            Issue::error(
                IssueCategory::Python,
                format!(
                    "Python {} does not satisfy required version {} (from {})",
                    current, required.spec, required.source
                ),
            )
            .with_hint(format!("Install Python {} or switch interpreters", wanted)),
        ),
        Compatibility::Unparsable => issues.push(Issue::warning(
            IssueCategory::Python,
            format!(
                "Could not interpret required Python version '{}' from {}",
                required.spec, required.source
            ),
        )),
    }
}

fn venv_issues(venv: &VenvFact, os: OsKind, issues: &mut Vec<Issue>) {
    match (venv.kind, venv.active, &venv.path) {
        (VenvKind::None, _, _) => issues.push(
            Issue::warning(IssueCategory::Venv, "No virtual environment detected")
                .with_fix("Create one with: python -m venv .venv"),
        ),
        (kind, false, path) => {
            let location = path
                .as_ref()
                .map(|p| format!(" at {}", p.display()))
                .unwrap_or_default();
            let mut issue = Issue::warning(
                IssueCategory::Venv,
                format!("A {} environment exists{} but is not active", kind, location),
            );
            issue = match path {
                Some(p) => issue.with_fix(format!("Activate it: {}", activation_command(os, kind, p))),
                None => issue.with_fix("Activate the project environment"),
            };
            issues.push(issue);
        }
        _ => {}
    }

    if let Some(conflict) = &venv.conflict {
        issues.push(Issue::info(
            IssueCategory::Venv,
            format!(
                "Environment variables indicate {}, but a {} environment was also found at {}; using {}",
                venv.kind,
                conflict.kind,
                conflict.path.display(),
                venv.kind
            ),
        ));
    }
}

fn dependency_issues(deps: &DependencyFact, issues: &mut Vec<Issue>) {
    if let Some(reason) = &deps.unreadable {
        let file = deps
            .source
            .as_ref()
            .map(|s| s.file_name())
            .unwrap_or_else(|| "dependency file".to_string());
        issues.push(Issue::warning(
            IssueCategory::Dependency,
            format!("Could not read {}: {}", file, reason),
        ));
        return;
    }

    if deps.source.is_none() {
        issues.push(Issue::info(
            IssueCategory::Dependency,
            "No dependency file found (requirements.txt, pyproject.toml, setup.py or Pipfile)",
        ));
        return;
    }

    if !deps.missing.is_empty() {
        let names: Vec<&str> = deps.missing.iter().map(String::as_str).collect();
        issues.push(
            Issue::error(
                IssueCategory::Dependency,
                format!(
                    "{} missing package{}: {}",
                    names.len(),
                    if names.len() == 1 { "" } else { "s" },
                    names.join(", ")
                ),
            )
            .with_fix(format!("pip install {}", names.join(" "))),
        );
    }

    if !deps.unknown.is_empty() {
        let names: Vec<&str> = deps.unknown.iter().map(String::as_str).collect();
        issues.push(Issue::info(
            IssueCategory::Dependency,
            format!("Could not verify: {} (check timed out or failed)", names.join(", ")),
        ));
    }
}

fn config_issues(config: &ConfigFact, issues: &mut Vec<Issue>) {
    if config.missing_expected.contains(".gitignore") {
        issues.push(
            Issue::warning(IssueCategory::Config, ".gitignore not found")
                .with_fix("Create a Python .gitignore"),
        );
    }

    if config.missing_expected.contains("README.md") {
        issues.push(Issue::info(IssueCategory::Config, "README.md not found"));
    }

    if !config.gitignore_missing_patterns.is_empty() {
        issues.push(
            Issue::info(
                IssueCategory::Config,
                format!(
                    ".gitignore is missing recommended patterns: {}",
                    config.gitignore_missing_patterns.join(", ")
                ),
            )
            .with_fix("Append the missing patterns to .gitignore"),
        );
    }

    if config.env_file_unignored {
        issues.push(
            Issue::error(
                IssueCategory::Config,
                ".env exists but is not ignored by git; secrets may be committed",
            )
            .with_fix("Add .env to .gitignore"),
        );
    }
}
