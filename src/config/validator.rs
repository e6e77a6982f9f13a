//! Configuration validation rules.
//!
//! All violations are collected so they can be fixed in one pass.

use crate::config::schema::HarmonizerConfig;
use crate::error::{HarmonizerError, Result};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &HarmonizerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let timeout = config.dependency_check_timeout_seconds;
    if !timeout.is_finite() || timeout <= 0.0 {
        errors.push(ValidationError {
            rule: "invalid-timeout".to_string(),
            message: format!(
                "dependency_check_timeout_seconds must be a positive number, got {}",
                timeout
            ),
        });
    }

    if config.default_checks.as_ref().is_some_and(|c| c.is_empty()) {
        errors.push(ValidationError {
            rule: "empty-default-checks".to_string(),
            message: "default_checks must list at least one check".to_string(),
        });
    }

    if config.python.as_ref().is_some_and(|p| p.trim().is_empty()) {
        errors.push(ValidationError {
            rule: "empty-python".to_string(),
            message: "python must name an interpreter command".to_string(),
        });
    }

    errors
}

/// Validate and fail on the first batch of errors.
pub fn validate(config: &HarmonizerConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(HarmonizerError::ConfigValidationError { message })
}
