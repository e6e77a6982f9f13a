//! Configuration file discovery and loading.

use crate::config::schema::{HarmonizerConfig, DEFAULT_CONFIG_TEMPLATE};
use crate::config::validator::validate;
use crate::error::{HarmonizerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched in the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".harmonizer.yml", ".harmonizer.yaml", ".harmonizer.json"];

/// First config file present in `project_root`.
pub fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML or JSON is invalid.
pub fn load_config_file(path: &Path) -> Result<HarmonizerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HarmonizerError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            HarmonizerError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML (or JSON) content.
pub fn parse_config(content: &str, source_path: &Path) -> Result<HarmonizerConfig> {
    if content.trim().is_empty() {
        return Ok(HarmonizerConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| HarmonizerError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate the config for a project.
///
/// An explicit `config_override` must exist. Without one, the discovered
/// file is used, or defaults when there is none.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<HarmonizerConfig> {
    let path = match config_override {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(project_root),
    };

    let config = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)?
        }
        None => HarmonizerConfig::default(),
    };

    validate(&config)?;
    Ok(config)
}

/// Write the default config file into `project_root`.
///
/// Refuses to overwrite an existing config unless `force` is set.
pub fn write_default_config(project_root: &Path, force: bool) -> Result<PathBuf> {
    if !force {
        if let Some(existing) = find_config_file(project_root) {
            return Err(HarmonizerError::ConfigValidationError {
                message: format!(
                    "{} already exists (use --force to overwrite)",
                    existing.display()
                ),
            });
        }
    }
    let path = project_root.join(CONFIG_FILE_NAMES[0]);
    fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::CheckKind;
    use tempfile::TempDir;

    #[test]
    fn discovery_prefers_yml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".harmonizer.json"), "{}").unwrap();
        fs::write(temp.path().join(".harmonizer.yml"), "").unwrap();
        let found = find_config_file(temp.path()).unwrap();
        assert!(found.ends_with(".harmonizer.yml"));
    }

    #[test]
    fn missing_config_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, HarmonizerConfig::default());
    }

    #[test]
    fn json_config_is_accepted() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".harmonizer.json"),
            r#"{"default_checks": ["python"], "fix_confirmation_required": false}"#,
        )
        .unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.default_checks, Some(vec![CheckKind::Python]));
        assert!(!config.fix_confirmation_required);
    }

    #[test]
    fn override_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path(), Some(&temp.path().join("nope.yml"))).unwrap_err();
        assert!(matches!(err, HarmonizerError::ConfigNotFound { .. }));
    }

    #[test]
    fn override_skips_discovery() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".harmonizer.yml"), "python: python3.10\n").unwrap();
        let custom = temp.path().join("custom.yml");
        fs::write(&custom, "python: python3.12\n").unwrap();
        let config = load_config(temp.path(), Some(&custom)).unwrap();
        assert_eq!(config.python.as_deref(), Some("python3.12"));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".harmonizer.yml"), "default_checks: [python\n").unwrap();
        let err = load_config(temp.path(), None).unwrap_err();
        assert!(matches!(err, HarmonizerError::ConfigParseError { .. }));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".harmonizer.yml"),
            "dependency_check_timeout_seconds: 0\n",
        )
        .unwrap();
        let err = load_config(temp.path(), None).unwrap_err();
        assert!(matches!(err, HarmonizerError::ConfigValidationError { .. }));
    }

    #[test]
    fn write_default_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = write_default_config(temp.path(), false).unwrap();
        assert!(path.exists());
        assert!(write_default_config(temp.path(), false).is_err());
        assert!(write_default_config(temp.path(), true).is_ok());
        assert_eq!(load_config(temp.path(), None).unwrap(), HarmonizerConfig::default());
    }
}
