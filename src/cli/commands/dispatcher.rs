//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::{Cli, Commands, ScanArgs};
use crate::config::{load_config, HarmonizerConfig};
use crate::error::Result;
use crate::scanner::Scanner;
use crate::shell::{CancelFlag, ProcessRunner, SystemRunner};
use crate::ui::{HarmonizerTheme, UserInterface};

/// A CLI subcommand.
pub trait Command {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,

    /// Process exit code (0 for success).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success unless `failed`, in which case exit code 1.
    pub fn from_outcome(failed: bool) -> Self {
        if failed {
            Self::failure(1)
        } else {
            Self::success()
        }
    }
}

/// Settings shared by every command.
#[derive(Clone)]
pub struct GlobalOptions {
    pub project_root: PathBuf,
    /// Explicit config file from `--config`.
    pub config: Option<PathBuf>,
    pub no_color: bool,
    pub runner: Arc<dyn ProcessRunner>,
    /// Stops a scan or fix between steps. The binary never sets it;
    /// embedders cancel through [`GlobalOptions::with_cancel`].
    pub cancel: CancelFlag,
}

impl GlobalOptions {
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config: None,
            no_color: false,
            runner: Arc::new(SystemRunner),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.config = config;
        self
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Project configuration, from `--config` or discovery.
    pub fn load_config(&self) -> Result<HarmonizerConfig> {
        load_config(&self.project_root, self.config.as_deref())
    }

    /// Scanner for the project root with config applied.
    pub fn scanner(&self, config: &HarmonizerConfig) -> Result<Scanner> {
        Ok(Scanner::new(&self.project_root)?
            .configure(config)
            .with_runner(Arc::clone(&self.runner)))
    }

    pub fn theme(&self) -> HarmonizerTheme {
        HarmonizerTheme::for_terminal(self.no_color)
    }
}

/// Routes CLI subcommands to their implementations.
pub struct CommandDispatcher {
    options: GlobalOptions,
}

impl CommandDispatcher {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn project_root(&self) -> &Path {
        self.options.project_root()
    }

    /// Run the selected subcommand; no subcommand means `scan`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Scan(args)) => {
                super::scan::ScanCommand::new(self.options.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Fix(args)) => {
                super::fix::FixCommand::new(self.options.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Init(args)) => {
                super::init::InitCommand::new(self.options.project_root(), args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::scan::ScanCommand::new(self.options.clone(), ScanArgs::default())
                .execute(ui),
        }
    }
}
