//! Configuration-file catalogue.

use super::ProbeContext;
use crate::status::ConfigFact;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Files every project is expected to have.
pub const EXPECTED_FILES: &[&str] = &[".gitignore", "README.md"];

/// Conventional files whose presence is recorded.
pub const CATALOGUE: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    "README.md",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements.txt",
    "requirements-dev.txt",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
    ".env",
    ".env.example",
    ".python-version",
    "runtime.txt",
    ".editorconfig",
    ".flake8",
    ".pylintrc",
    "mypy.ini",
    ".pre-commit-config.yaml",
    "pytest.ini",
    "tox.ini",
    ".coveragerc",
    "Dockerfile",
    "docker-compose.yml",
    ".dockerignore",
    "LICENSE",
    "CHANGELOG.md",
    ".github/workflows",
];

/// Patterns a Python `.gitignore` should contain.
pub const RECOMMENDED_GITIGNORE_PATTERNS: &[&str] = &[
    "__pycache__",
    "*.pyc",
    ".env",
    "venv/",
    "*.egg-info",
    ".pytest_cache",
];

/// Record which catalogue files exist and audit `.gitignore`.
pub fn probe(ctx: &ProbeContext<'_>) -> ConfigFact {
    let project = ctx.project;
    let found: BTreeSet<String> = CATALOGUE
        .iter()
        .filter(|name| project.join(name).exists())
        .map(|name| name.to_string())
        .collect();
    let missing_expected = EXPECTED_FILES
        .iter()
        .filter(|name| !found.contains(**name))
        .map(|name| name.to_string())
        .collect();

    let gitignore = read_gitignore(project);
    let gitignore_missing_patterns = gitignore
        .as_ref()
        .map(|lines| missing_patterns(lines))
        .unwrap_or_default();

    let env_file_unignored = project.join(".env").is_file()
        && !gitignore
            .as_ref()
            .is_some_and(|lines| pattern_covered(lines, ".env"));

    tracing::debug!("Found {} catalogued config files", found.len());

    ConfigFact {
        found,
        missing_expected,
        gitignore_missing_patterns,
        env_file_unignored,
    }
}

/// Meaningful `.gitignore` lines, or `None` when there is no readable file.
pub fn read_gitignore(project: &Path) -> Option<Vec<String>> {
    let text = fs::read_to_string(project.join(".gitignore")).ok()?;
    Some(
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect(),
    )
}

/// Recommended patterns not covered by `lines`, in recommendation order.
pub fn missing_patterns(lines: &[String]) -> Vec<String> {
    RECOMMENDED_GITIGNORE_PATTERNS
        .iter()
        .filter(|p| !pattern_covered(lines, p))
        .map(|p| p.to_string())
        .collect()
}

/// Whether some line covers `pattern`, ignoring anchoring and trailing slashes.
pub fn pattern_covered(lines: &[String], pattern: &str) -> bool {
    let wanted = canonical(pattern);
    lines.iter().any(|line| {
        let have = canonical(line);
        have == wanted || equivalents(&wanted).iter().any(|e| *e == have)
    })
}

fn canonical(pattern: &str) -> String {
    pattern
        .trim()
        .trim_start_matches("**/")
        .trim_start_matches('/')
        .trim_end_matches('/')
        .to_string()
}

fn equivalents(pattern: &str) -> &'static [&'static str] {
    match pattern {
        "*.pyc" => &["*.py[cod]", "*.py[co]", "*.py[oc]"],
        ".env" => &[".env*", "*.env"],
        "venv" => &[".venv", "venv*", "*venv"],
        "*.egg-info" => &["*.egg-info*", "*.egg"],
        _ => &[],
    }
}
