//! Error types for Harmonizer operations.
//!
//! This module defines [`HarmonizerError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe-level failures never surface here; they are recorded as degraded
//!   facts in the [`Status`](crate::status::Status)
//! - Use `HarmonizerError` for failures the caller must act on (bad project
//!   path, broken config, cancellation)
//! - Use `anyhow::Error` (via `HarmonizerError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Harmonizer operations.
#[derive(Debug, Error)]
pub enum HarmonizerError {
    /// The project path does not exist.
    #[error("Project path does not exist: {path}")]
    ProjectNotFound { path: PathBuf },

    /// The project path exists but is not a directory.
    #[error("Project path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values or argument combination.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A subprocess exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess exceeded its time budget and was killed.
    #[error("Command timed out after {timeout_secs:.1}s: {command}")]
    CommandTimedOut { command: String, timeout_secs: f64 },

    /// A subprocess could not be started at all.
    #[error("Could not start '{command}': {message}")]
    CommandSpawn { command: String, message: String },

    /// The operation was cancelled between steps.
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarmonizerError {
    /// Process exit code for this error.
    ///
    /// Usage problems (bad path, bad config) exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ProjectNotFound { .. }
            | Self::NotADirectory { .. }
            | Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => 2,
            Self::Cancelled => 130,
            Self::CommandFailed { .. }
            | Self::CommandTimedOut { .. }
            | Self::CommandSpawn { .. }
            | Self::Io(_)
            | Self::Other(_) => 1,
        }
    }

    /// Whether this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::CommandTimedOut { .. })
    }
}

/// Result type alias for Harmonizer operations.
pub type Result<T> = std::result::Result<T, HarmonizerError>;
