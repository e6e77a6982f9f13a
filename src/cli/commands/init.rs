//! Init command implementation.
//!
//! `harmonizer init` writes a commented default `.harmonizer.yml`.

use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::write_default_config;
use crate::error::{HarmonizerError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !self.project_root.is_dir() {
            return Err(HarmonizerError::ProjectNotFound {
                path: self.project_root.clone(),
            });
        }

        let path = write_default_config(&self.project_root, self.args.force)?;
        ui.success(&format!("Created {}", path.display()));
        ui.message("Run `harmonizer scan` to check this project.");
        Ok(CommandResult::success())
    }
}
