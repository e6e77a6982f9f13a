//! Harmonizer - Python project environment checks and fixes.
//!
//! Harmonizer inspects a Python project directory and its host, reports a
//! [`Status`] with categorized issues, and can repair the common ones
//! (missing packages, missing virtual environment, incomplete `.gitignore`).
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.harmonizer.yml` loading and validation
//! - [`error`] - Error types and result aliases
//! - [`fixers`] - Issue repair with preview and confirmation
//! - [`probes`] - Fact collection for each check
//! - [`scanner`] - Check selection and concurrent probe execution
//! - [`shell`] - Subprocess execution behind a mockable runner
//! - [`status`] - The status snapshot, facts, issues and rules
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```no_run
//! use harmonizer::{CheckKind, CheckSelection};
//!
//! let checks = CheckSelection::only([CheckKind::Config]);
//! let status = harmonizer::scan(".", Some(&checks)).unwrap();
//! for issue in status.issues() {
//!     println!("[{}] {}", issue.category, issue.message);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fixers;
pub mod probes;
pub mod scanner;
pub mod shell;
pub mod status;
pub mod ui;

pub use error::{HarmonizerError, Result};
pub use fixers::{FixOptions, FixSession, Fixer};
pub use scanner::{scan, CheckKind, CheckSelection, Scanner};
pub use status::{FixResult, Issue, IssueCategory, IssueSeverity, Status};
