//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::scanner::{CheckKind, CheckSelection};
use crate::status::IssueCategory;

/// Harmonizer - diagnose and repair Python project environments.
#[derive(Debug, Parser)]
#[command(name = "harmonizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides discovery of .harmonizer.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the project environment (default if no command specified)
    Scan(ScanArgs),

    /// Fix detected issues
    Fix(FixArgs),

    /// Write a default .harmonizer.yml
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    /// Run only these checks (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "skip")]
    pub check: Vec<CheckKind>,

    /// Skip these checks (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<CheckKind>,

    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the report to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ScanArgs {
    /// Explicit selection from `--check`/`--skip`, if either was given.
    pub fn selection(&self) -> Option<CheckSelection> {
        if !self.check.is_empty() {
            Some(CheckSelection::only(self.check.iter().copied()))
        } else if !self.skip.is_empty() {
            Some(CheckSelection::excluding(self.skip.iter().copied()))
        } else {
            None
        }
    }
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixArgs {
    /// Show what would be fixed without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Apply fixes without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Fix only these categories (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<FixTarget>,
}

/// Categories that have a fixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FixTarget {
    Venv,
    Dependency,
    Config,
}

impl FixTarget {
    pub const ALL: [FixTarget; 3] = [FixTarget::Venv, FixTarget::Dependency, FixTarget::Config];

    pub fn category(&self) -> IssueCategory {
        match self {
            FixTarget::Venv => IssueCategory::Venv,
            FixTarget::Dependency => IssueCategory::Dependency,
            FixTarget::Config => IssueCategory::Config,
        }
    }

    /// Checks whose facts this target's fixer reads.
    pub fn checks(&self) -> &'static [CheckKind] {
        match self {
            FixTarget::Venv => &[CheckKind::Os, CheckKind::Venv],
            FixTarget::Dependency => &[CheckKind::Dependencies],
            FixTarget::Config => &[CheckKind::Config],
        }
    }
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["harmonizer"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn scan_checks_are_comma_separated() {
        let cli = Cli::try_parse_from(["harmonizer", "scan", "--check", "python,venv"]).unwrap();
        let Some(Commands::Scan(args)) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.check, vec![CheckKind::Python, CheckKind::Venv]);
        let sel = args.selection().unwrap();
        assert!(sel.contains(CheckKind::Venv));
        assert!(!sel.contains(CheckKind::Os));
    }

    #[test]
    fn check_and_skip_conflict() {
        let result = Cli::try_parse_from(["harmonizer", "scan", "--check", "os", "--skip", "venv"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_check_is_rejected() {
        assert!(Cli::try_parse_from(["harmonizer", "scan", "--check", "network"]).is_err());
    }

    #[test]
    fn skip_builds_exclusion() {
        let args = ScanArgs {
            skip: vec![CheckKind::Dependencies],
            ..Default::default()
        };
        let sel = args.selection().unwrap();
        assert!(!sel.contains(CheckKind::Dependencies));
        assert!(sel.contains(CheckKind::Config));
        assert!(ScanArgs::default().selection().is_none());
    }

    #[test]
    fn fix_flags_parse() {
        let cli = Cli::try_parse_from([
            "harmonizer",
            "fix",
            "--dry-run",
            "-y",
            "--only",
            "dependency,config",
        ])
        .unwrap();
        let Some(Commands::Fix(args)) = cli.command else {
            panic!("expected fix");
        };
        assert!(args.dry_run);
        assert!(args.yes);
        assert_eq!(args.only, vec![FixTarget::Dependency, FixTarget::Config]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["harmonizer", "scan", "--project", "/tmp", "--quiet"]).unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/tmp")));
        assert!(cli.quiet);
    }

    #[test]
    fn fix_targets_map_to_categories() {
        assert_eq!(FixTarget::Venv.category(), IssueCategory::Venv);
        assert!(FixTarget::Venv.checks().contains(&CheckKind::Os));
        assert_eq!(FixTarget::Dependency.checks(), &[CheckKind::Dependencies]);
    }
}
