//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`], which also carries the global flags every command
//! shares (project root, config override, output mode).

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod fix;
pub mod init;
pub mod scan;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, GlobalOptions};
