//! Declared vs. installed dependencies.

use super::ProbeContext;
use crate::shell::Invocation;
use crate::status::{DependencyFact, DependencySource, DependencySourceKind};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Dependency files in priority order.
const SOURCES: &[(&str, DependencySourceKind)] = &[
    ("requirements.txt", DependencySourceKind::Requirements),
    ("pyproject.toml", DependencySourceKind::Pyproject),
    ("setup.py", DependencySourceKind::SetupPy),
    ("Pipfile", DependencySourceKind::Pipfile),
];

/// Installed state of a single package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    Installed,
    Missing,
    /// The check timed out or could not run.
    Unknown,
}

/// Locate the dependency file, parse it and check every package.
pub fn probe(ctx: &ProbeContext<'_>) -> DependencyFact {
    let mut fact = DependencyFact::default();

    let Some(source) = locate_source(ctx.project) else {
        tracing::debug!("No dependency file in {}", ctx.project.display());
        return fact;
    };

    let declared = fs::read_to_string(&source.path)
        .map_err(|e| e.to_string())
        .and_then(|text| parse_source(source.kind, &text));
    fact.source = Some(source);

    let declared = match declared {
        Ok(names) => names,
        Err(reason) => {
            tracing::warn!("Could not read dependency file: {}", reason);
            fact.unreadable = Some(reason);
            return fact;
        }
    };

    for name in &declared {
        match check_installed(ctx, name) {
            PackageState::Installed => {}
            PackageState::Missing => {
                fact.missing.insert(name.clone());
            }
            PackageState::Unknown => {
                fact.unknown.insert(name.clone());
            }
        }
    }
    fact.declared = declared;
    fact
}

/// First existing dependency file.
pub fn locate_source(project: &Path) -> Option<DependencySource> {
    SOURCES.iter().find_map(|(file, kind)| {
        let path = project.join(file);
        path.is_file().then(|| DependencySource { path, kind: *kind })
    })
}

/// The `pip show` invocation for `name`.
pub fn show_invocation(python: &str, name: &str) -> Invocation {
    Invocation::new(python).args(["-m", "pip", "show", "--quiet", name])
}

/// Ask pip whether `name` is installed, within the configured timeout.
pub fn check_installed(ctx: &ProbeContext<'_>, name: &str) -> PackageState {
    let invocation = show_invocation(&ctx.python, name)
        .current_dir(ctx.project)
        .timeout(ctx.command_timeout);

    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => PackageState::Installed,
        Ok(result) if result.stderr.contains("No module named pip") => {
            tracing::warn!("pip is not available for {}", ctx.python);
            PackageState::Unknown
        }
        Ok(_) => PackageState::Missing,
        Err(e) => {
            tracing::warn!("Could not check {}: {}", name, e);
            PackageState::Unknown
        }
    }
}

/// Parse declared package names from a dependency file.
pub fn parse_source(kind: DependencySourceKind, text: &str) -> Result<Vec<String>, String> {
    let names = match kind {
        DependencySourceKind::Requirements => parse_requirements(text),
        DependencySourceKind::Pyproject => parse_pyproject(text)?,
        DependencySourceKind::SetupPy => parse_setup_py(text),
        DependencySourceKind::Pipfile => parse_pipfile(text)?,
    };
    Ok(dedup(names))
}

/// One package per requirement line.
///
/// Skips comments, pip options (`-r`, `-e`, `--index-url`), VCS/URL lines and
/// local paths, then strips markers, extras and version qualifiers.
pub fn parse_requirements(text: &str) -> Vec<String> {
    text.lines().filter_map(requirement_name).collect()
}

fn requirement_name(line: &str) -> Option<String> {
    let line = strip_comment(line).trim();
    if line.is_empty() || line.starts_with('-') {
        return None;
    }
    if line.contains("://") || line.starts_with("git+") || is_local_path(line) {
        return None;
    }
    let line = line.split(';').next().unwrap_or("");
    let end = line
        .find(|c: char| matches!(c, '[' | '=' | '<' | '>' | '!' | '~' | '@' | ' ' | '('))
        .unwrap_or(line.len());
    let name = line[..end].trim();
    // Distribution names start with a letter or digit.
    if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(normalize_name(name))
}

/// Text before a `#` that starts the line or follows whitespace.
fn strip_comment(line: &str) -> &str {
    let mut prev_ws = true;
    for (i, c) in line.char_indices() {
        if c == '#' && prev_ws {
            return &line[..i];
        }
        prev_ws = c.is_whitespace();
    }
    line
}

/// Local directories and archives installed by path.
fn is_local_path(line: &str) -> bool {
    let bytes = line.as_bytes();
    let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    line.starts_with(['.', '/', '\\', '~'])
        || drive
        || [".whl", ".tar.gz", ".zip"]
            .iter()
            .any(|ext| line.to_ascii_lowercase().ends_with(ext))
}

fn parse_pyproject(text: &str) -> Result<Vec<String>, String> {
    let doc: toml::Table = toml::from_str(text).map_err(|e| e.message().to_string())?;

    if let Some(deps) = doc
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        return Ok(deps
            .iter()
            .filter_map(|d| d.as_str())
            .filter_map(requirement_name)
            .collect());
    }

    let poetry = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table());
    Ok(poetry
        .map(|table| {
            table
                .keys()
                .filter(|k| k.as_str() != "python")
                .map(|k| normalize_name(k))
                .collect()
        })
        .unwrap_or_default())
}

fn parse_setup_py(text: &str) -> Vec<String> {
    let (Ok(block), Ok(item)) = (
        Regex::new(r"(?s)install_requires\s*=\s*\[(.*?)\]"),
        Regex::new(r#"['"]([^'"]+)['"]"#),
    ) else {
        return Vec::new();
    };
    let Some(list) = block.captures(text) else {
        return Vec::new();
    };
    item.captures_iter(&list[1])
        .filter_map(|c| requirement_name(&c[1]))
        .collect()
}

fn parse_pipfile(text: &str) -> Result<Vec<String>, String> {
    let doc: toml::Table = toml::from_str(text).map_err(|e| e.message().to_string())?;
    Ok(doc
        .get("packages")
        .and_then(|p| p.as_table())
        .map(|t| t.keys().map(|k| normalize_name(k)).collect())
        .unwrap_or_default())
}

/// Lowercase with `_` and `.` folded to `-`.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['_', '.'], "-")
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::testing::make_env;
    use crate::shell::{FakeResponse, FakeRunner};
    use tempfile::TempDir;

    fn show(name: &str) -> String {
        show_invocation("python3", name).command_line()
    }

    #[test]
    fn requirements_parsing() {
        let text = "\
# core
requests>=2.31
Click==8.1.7  # cli
-r dev.txt
-e .
--index-url https://example.org/simple
git+https://github.com/org/repo.git
uvicorn[standard]~=0.23
pywin32; sys_platform == 'win32'
Flask_SQLAlchemy
";
        assert_eq!(
            parse_requirements(text),
            vec!["requests", "click", "uvicorn", "pywin32", "flask-sqlalchemy"]
        );
    }

    #[test]
    fn url_requirement_is_skipped() {
        assert_eq!(
            requirement_name("mypkg @ https://example.org/mypkg.whl"),
            None
        );
        assert_eq!(requirement_name("numpy (>=1.0)").as_deref(), Some("numpy"));
    }

    #[test]
    fn tab_before_comment_is_stripped() {
        assert_eq!(
            requirement_name("requests\t# pinned by ops").as_deref(),
            Some("requests")
        );
        assert_eq!(requirement_name("# only a comment"), None);
    }

    #[test]
    fn local_paths_are_skipped() {
        assert_eq!(requirement_name("./vendor/mypkg"), None);
        assert_eq!(requirement_name("../shared"), None);
        assert_eq!(requirement_name("/opt/wheels/foo-1.0-py3-none-any.whl"), None);
        assert_eq!(requirement_name(r"C:\wheels\foo.tar.gz"), None);
        assert_eq!(requirement_name("dist/foo-1.0.tar.gz"), None);
    }

    #[test]
    fn parsed_names_never_look_like_options() {
        let text = "requests\t# pinned by ops\n./vendor/mypkg\n/opt/wheels/foo-1.0.whl\n";
        let names = parse_requirements(text);
        assert_eq!(names, vec!["requests"]);
        assert!(names.iter().all(|n| !n.starts_with('-')));
    }

    #[test]
    fn pyproject_pep621_dependencies() {
        let text = "[project]\nname = \"demo\"\ndependencies = [\"requests>=2\", \"rich\"]\n";
        assert_eq!(parse_pyproject(text).unwrap(), vec!["requests", "rich"]);
    }

    #[test]
    fn pyproject_poetry_dependencies_skip_python() {
        let text = "[tool.poetry.dependencies]\npython = \"^3.11\"\nrequests = \"^2.31\"\n";
        assert_eq!(parse_pyproject(text).unwrap(), vec!["requests"]);
    }

    #[test]
    fn pyproject_poetry_keeps_declaration_order() {
        let text = "\
[tool.poetry.dependencies]
zope-interface = \"*\"
python = \"^3.11\"
requests = \"^2.31\"
Attrs = \"^23\"
";
        assert_eq!(
            parse_pyproject(text).unwrap(),
            vec!["zope-interface", "requests", "attrs"]
        );
    }

    #[test]
    fn pyproject_parse_error() {
        assert!(parse_pyproject("[project\n").is_err());
    }

    #[test]
    fn setup_py_install_requires() {
        let text = "setup(\n  install_requires=[\n    'requests>=2',\n    \"click\",\n  ],\n)\n";
        assert_eq!(parse_setup_py(text), vec!["requests", "click"]);
    }

    #[test]
    fn pipfile_packages() {
        let text = "[packages]\nrequests = \"*\"\nDjango = \">=4\"\n\n[dev-packages]\npytest = \"*\"\n";
        assert_eq!(parse_pipfile(text).unwrap(), vec!["requests", "django"]);
    }

    #[test]
    fn duplicates_removed_in_order() {
        let names = parse_source(
            DependencySourceKind::Requirements,
            "requests\nclick\nRequests>=2\n",
        )
        .unwrap();
        assert_eq!(names, vec!["requests", "click"]);
    }

    #[test]
    fn requirements_txt_takes_priority() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "[project]\n").unwrap();
        fs::write(temp.path().join("requirements.txt"), "requests\n").unwrap();
        let source = locate_source(temp.path()).unwrap();
        assert_eq!(source.kind, DependencySourceKind::Requirements);
    }

    #[test]
    fn probe_without_source() {
        let temp = TempDir::new().unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new();
        let ctx = ProbeContext::new(temp.path(), &runner, &env);
        let fact = probe(&ctx);
        assert!(fact.source.is_none());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn probe_classifies_each_package() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "requests\nclick\nnumpy\n").unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new()
            .respond(&show("requests"), FakeResponse::ok())
            .respond(&show("click"), FakeResponse::fail(1, "WARNING: Package(s) not found: click"))
            .respond(&show("numpy"), FakeResponse::Timeout);
        let ctx = ProbeContext::new(temp.path(), &runner, &env).with_python("python3");

        let fact = probe(&ctx);
        assert_eq!(fact.declared, vec!["requests", "click", "numpy"]);
        assert_eq!(fact.missing.iter().collect::<Vec<_>>(), vec!["click"]);
        assert_eq!(fact.unknown.iter().collect::<Vec<_>>(), vec!["numpy"]);
    }

    #[test]
    fn missing_pip_is_unknown_not_missing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "requests\n").unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new().respond(
            &show("requests"),
            FakeResponse::fail(1, "/usr/bin/python3: No module named pip"),
        );
        let ctx = ProbeContext::new(temp.path(), &runner, &env).with_python("python3");

        let fact = probe(&ctx);
        assert!(fact.missing.is_empty());
        assert!(fact.unknown.contains("requests"));
    }

    #[test]
    fn unparsable_source_is_unreadable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Pipfile"), "[packages\n").unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new();
        let ctx = ProbeContext::new(temp.path(), &runner, &env);

        let fact = probe(&ctx);
        assert!(fact.source.is_some());
        assert!(fact.unreadable.is_some());
        assert!(fact.declared.is_empty());
    }

    #[test]
    fn timeout_is_passed_to_each_check() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "requests\n").unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new().respond(&show("requests"), FakeResponse::Timeout);
        let ctx = ProbeContext::new(temp.path(), &runner, &env)
            .with_python("python3")
            .with_command_timeout(std::time::Duration::from_millis(1500));
        assert_eq!(check_installed(&ctx, "requests"), PackageState::Unknown);
    }
}
