//! Scan command implementation.
//!
//! `harmonizer scan` probes the project and reports its status. The exit
//! code is 1 when any Error-severity issue is found.

use std::fs;

use crate::cli::args::ScanArgs;
use crate::error::Result;
use crate::ui::{HarmonizerTheme, UserInterface};

use super::dispatcher::{Command, CommandResult, GlobalOptions};
use super::display;

pub struct ScanCommand {
    options: GlobalOptions,
    args: ScanArgs,
}

impl ScanCommand {
    pub fn new(options: GlobalOptions, args: ScanArgs) -> Self {
        Self { options, args }
    }

    pub fn args(&self) -> &ScanArgs {
        &self.args
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.options.load_config()?;
        let scanner = self.options.scanner(&config)?;
        let selection = self
            .args
            .selection()
            .unwrap_or_else(|| config.default_selection());

        tracing::debug!("Scanning {} for checks: {}", scanner.project_path().display(), selection);

        let status = if self.args.json {
            scanner.scan_with_cancel(&selection, &self.options.cancel)?
        } else {
            let mut spinner = ui.start_spinner("Scanning environment...");
            let status = scanner.scan_with_cancel(&selection, &self.options.cancel);
            spinner.finish_clear();
            status?
        };

        let verbose = ui.output_mode().shows_details();
        if self.args.json {
            let json = display::status_json(&status)?;
            // JSON goes to stdout regardless of output mode.
            println!("{}", json);
            if let Some(path) = &self.args.output {
                fs::write(path, format!("{}\n", json))?;
            }
        } else {
            ui.message(&display::render_status(&status, &self.options.theme(), verbose));
            if let Some(path) = &self.args.output {
                let plain = HarmonizerTheme::plain();
                fs::write(path, format!("{}\n", display::render_status(&status, &plain, verbose)))?;
            }
        }

        if let Some(path) = &self.args.output {
            tracing::info!("Report written to {}", path.display());
        }

        Ok(CommandResult::from_outcome(status.has_errors()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::CheckKind;
    use crate::shell::FakeRunner;
    use crate::ui::MockUI;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn options(temp: &TempDir) -> GlobalOptions {
        GlobalOptions::new(temp.path().to_path_buf())
            .with_no_color(true)
            .with_runner(Arc::new(FakeRunner::new()))
    }

    fn config_only() -> ScanArgs {
        ScanArgs {
            check: vec![CheckKind::Config],
            ..Default::default()
        }
    }

    #[test]
    fn clean_config_scan_succeeds() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".gitignore"),
            "__pycache__/\n*.pyc\n.env\nvenv/\n*.egg-info\n.pytest_cache/\n",
        )
        .unwrap();
        fs::write(temp.path().join("README.md"), "# demo\n").unwrap();
        let mut ui = MockUI::new();

        let result = ScanCommand::new(options(&temp), config_only()).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("No issues found"));
        assert!(ui.spinners().iter().any(|s| s.contains("Scanning")));
    }

    #[test]
    fn error_issue_fails_the_scan() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "*.pyc\n").unwrap();
        fs::write(temp.path().join(".env"), "TOKEN=x\n").unwrap();
        let mut ui = MockUI::new();

        let result = ScanCommand::new(options(&temp), config_only()).execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_message(".env exists but is not ignored"));
    }

    #[test]
    fn output_file_receives_plain_report() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("report.txt");
        let args = ScanArgs {
            output: Some(out.clone()),
            ..config_only()
        };
        let mut ui = MockUI::new();

        ScanCommand::new(options(&temp), args).execute(&mut ui).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("⚠ [config] .gitignore not found"));
        assert!(written.contains("fixable"));
    }

    #[test]
    fn json_output_file_is_valid_json() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("status.json");
        let args = ScanArgs {
            json: true,
            output: Some(out.clone()),
            ..config_only()
        };
        let mut ui = MockUI::new();

        ScanCommand::new(options(&temp), args).execute(&mut ui).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(value["python"].is_null());
        assert!(value["config_files"]["missing_expected"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == ".gitignore"));
        assert!(ui.spinners().is_empty());
    }

    #[test]
    fn config_default_checks_apply_without_flags() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".harmonizer.yml"), "default_checks: [config]\n").unwrap();
        let mut ui = MockUI::new();

        ScanCommand::new(options(&temp), ScanArgs::default()).execute(&mut ui).unwrap();

        assert!(ui.has_message("Config files"));
        assert!(!ui.has_message("Dependencies"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".harmonizer.yml"), "dependency_check_timeout_seconds: -1\n").unwrap();
        let mut ui = MockUI::new();

        let err = ScanCommand::new(options(&temp), config_only()).execute(&mut ui).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
