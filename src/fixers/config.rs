//! Creates or completes the project `.gitignore`.

use super::{FixAction, Fixer, PlannedFix};
use crate::probes::config_files::{pattern_covered, read_gitignore, RECOMMENDED_GITIGNORE_PATTERNS};
use crate::status::{IssueCategory, Status};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Written when a project has no `.gitignore`.
pub const GITIGNORE_TEMPLATE: &str = "\
# Byte-compiled / optimized files
__pycache__/
*.py[cod]
*$py.class

# Distribution / packaging
build/
dist/
*.egg-info/
.eggs/

# Virtual environments
.venv/
venv/
env/

# Environment variables
.env

# Testing and tooling caches
.pytest_cache/
.mypy_cache/
.coverage
htmlcov/
.tox/

# Editors
.idea/
.vscode/
*.swp
";

#[derive(Debug, Default)]
pub struct ConfigFixer;

impl ConfigFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for ConfigFixer {
    fn category(&self) -> IssueCategory {
        IssueCategory::Config
    }

    fn plan(&self, status: &Status) -> Vec<PlannedFix> {
        let Some(config) = status.config_files() else {
            return Vec::new();
        };

        if config.missing_expected.contains(".gitignore") {
            return vec![PlannedFix::mutating(
                "Create .gitignore with Python defaults",
                FixAction::CreateGitignore,
            )];
        }

        let mut patterns = config.gitignore_missing_patterns.clone();
        if config.env_file_unignored && !patterns.iter().any(|p| p == ".env") {
            patterns.push(".env".to_string());
        }
        if patterns.is_empty() {
            return Vec::new();
        }

        vec![PlannedFix::mutating(
            format!("Add {} to .gitignore", patterns.join(", ")),
            FixAction::AppendGitignore(patterns),
        )]
    }

    fn perform(&self, status: &Status, fix: &PlannedFix) -> Result<(), String> {
        let project = status.project_path();
        let result = match &fix.action {
            FixAction::CreateGitignore => create_gitignore(project),
            FixAction::AppendGitignore(patterns) => append_patterns(project, patterns),
            _ => return Ok(()),
        };
        result.map_err(|e| e.to_string())
    }
}

/// Write the template, or complete an existing file created since the scan.
fn create_gitignore(project: &Path) -> std::io::Result<()> {
    let path = project.join(".gitignore");
    if path.exists() {
        let recommended: Vec<String> = RECOMMENDED_GITIGNORE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect();
        return append_patterns(project, &recommended);
    }
    fs::write(&path, GITIGNORE_TEMPLATE)
}

/// Append the patterns not yet covered. Writes nothing when all are present.
fn append_patterns(project: &Path, patterns: &[String]) -> std::io::Result<()> {
    let path = project.join(".gitignore");
    let lines = read_gitignore(project).unwrap_or_default();
    let needed: Vec<&String> = patterns
        .iter()
        .filter(|p| !pattern_covered(&lines, p))
        .collect();
    if needed.is_empty() {
        return Ok(());
    }

    let existing = fs::read_to_string(&path).unwrap_or_default();
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "\n# Added by harmonizer")?;
    for pattern in needed {
        writeln!(file, "{}", pattern)?;
    }
    Ok(())
}
