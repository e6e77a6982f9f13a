//! Interpreter version and declared requirement.
//!
//! The probe only reports; compatibility is decided by the issue rules.

use super::ProbeContext;
use crate::status::{PythonFact, RequiredVersion};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Report the running interpreter and the project's declared requirement.
pub fn probe(ctx: &ProbeContext<'_>) -> PythonFact {
    let required = find_required_version(ctx.project);
    match ctx.interpreter() {
        Ok(info) => {
            tracing::debug!("Python {} at {}", info.version, info.executable.display());
            PythonFact {
                version: Some(info.version.clone()),
                executable: Some(info.executable.clone()),
                required,
                note: None,
            }
        }
        Err(note) => PythonFact {
            version: None,
            executable: None,
            required,
            note: Some(note.to_string()),
        },
    }
}

/// First declared requirement, checking sources in priority order.
pub fn find_required_version(project: &Path) -> Option<RequiredVersion> {
    let sources: [(&str, fn(&str) -> Option<String>); 5] = [
        (".python-version", from_python_version),
        ("runtime.txt", from_runtime_txt),
        ("pyproject.toml", from_pyproject),
        ("setup.py", from_setup_py),
        (".tool-versions", from_tool_versions),
    ];

    for (file, extract) in sources {
        let path = project.join(file);
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        if let Some(spec) = extract(&text) {
            tracing::debug!("Required Python {} from {}", spec, file);
            return Some(RequiredVersion {
                spec,
                source: file.to_string(),
            });
        }
    }
    None
}

fn meaningful_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

fn from_python_version(text: &str) -> Option<String> {
    meaningful_lines(text).next().map(str::to_string)
}

fn from_runtime_txt(text: &str) -> Option<String> {
    meaningful_lines(text)
        .find_map(|l| l.strip_prefix("python-"))
        .map(str::to_string)
}

fn from_pyproject(text: &str) -> Option<String> {
    let doc: toml::Table = match toml::from_str(text) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("pyproject.toml does not parse: {}", e);
            return None;
        }
    };

    let pep621 = doc
        .get("project")
        .and_then(|p| p.get("requires-python"))
        .and_then(|v| v.as_str());
    if let Some(spec) = pep621 {
        return Some(spec.to_string());
    }

    let poetry = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.get("python"))?;
    poetry
        .as_str()
        .or_else(|| poetry.get("version").and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn from_setup_py(text: &str) -> Option<String> {
    let re = Regex::new(r#"python_requires\s*=\s*['"]([^'"]+)['"]"#).ok()?;
    re.captures(text).map(|c| c[1].to_string())
}

fn from_tool_versions(text: &str) -> Option<String> {
    meaningful_lines(text).find_map(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("python"), Some(version)) => Some(version.to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::interpreter::query_command_line;
    use crate::probes::testing::make_env;
    use crate::shell::{FakeResponse, FakeRunner};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn python_version_file_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".python-version"), "3.9\n").unwrap();
        fs::write(temp.path().join("runtime.txt"), "python-3.11.4\n").unwrap();

        let req = find_required_version(temp.path()).unwrap();
        assert_eq!(req.spec, "3.9");
        assert_eq!(req.source, ".python-version");
    }

    #[test]
    fn runtime_txt() {
        assert_eq!(from_runtime_txt("python-3.11.4\n").as_deref(), Some("3.11.4"));
        assert_eq!(from_runtime_txt("ruby-3.2\n"), None);
    }

    #[test]
    fn pyproject_pep621() {
        let text = "[project]\nname = \"demo\"\nrequires-python = \">=3.10\"\n";
        assert_eq!(from_pyproject(text).as_deref(), Some(">=3.10"));
    }

    #[test]
    fn pyproject_poetry() {
        let text = "[tool.poetry.dependencies]\npython = \"^3.11\"\nrequests = \"^2.31\"\n";
        assert_eq!(from_pyproject(text).as_deref(), Some("^3.11"));
    }

    #[test]
    fn pyproject_poetry_table_form() {
        let text = "[tool.poetry.dependencies]\npython = { version = \"^3.9\" }\n";
        assert_eq!(from_pyproject(text).as_deref(), Some("^3.9"));
    }

    #[test]
    fn broken_pyproject_is_skipped() {
        assert_eq!(from_pyproject("[project\nrequires-python ="), None);
    }

    #[test]
    fn setup_py_python_requires() {
        let text = "setup(\n    name='demo',\n    python_requires=\">=3.8\",\n)\n";
        assert_eq!(from_setup_py(text).as_deref(), Some(">=3.8"));
    }

    #[test]
    fn tool_versions() {
        let text = "nodejs 20.10.0\npython 3.12.1\n";
        assert_eq!(from_tool_versions(text).as_deref(), Some("3.12.1"));
    }

    #[test]
    fn no_sources_no_requirement() {
        let temp = TempDir::new().unwrap();
        assert!(find_required_version(temp.path()).is_none());
    }

    #[test]
    fn probe_reports_interpreter_and_requirement() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".python-version"), "3.9\n").unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new().respond(
            &query_command_line("python3"),
            FakeResponse::Success("3.8.10\n/usr/bin/python3\n/usr\n/usr\n".into()),
        );
        let ctx = ProbeContext::new(temp.path(), &runner, &env).with_python("python3");

        let fact = probe(&ctx);
        assert_eq!(fact.version.as_deref(), Some("3.8.10"));
        assert_eq!(fact.executable, Some(PathBuf::from("/usr/bin/python3")));
        assert_eq!(fact.required.unwrap().spec, "3.9");
        assert!(fact.note.is_none());
    }

    #[test]
    fn probe_degrades_when_interpreter_missing() {
        let temp = TempDir::new().unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new();
        let ctx = ProbeContext::new(temp.path(), &runner, &env).with_python("python3");

        let fact = probe(&ctx);
        assert!(fact.version.is_none());
        assert!(fact.note.is_some());
    }
}
