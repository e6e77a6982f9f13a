//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use harmonizer::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".harmonizer.yml"), "fix_confirmation_required: false").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert!(!config.fix_confirmation_required);
//! ```
//!
//! # Configuration File Locations
//!
//! The first of `.harmonizer.yml`, `.harmonizer.yaml` and `.harmonizer.json`
//! in the project root is used. `--config` replaces discovery.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_config_file, load_config, load_config_file, parse_config, write_default_config,
    CONFIG_FILE_NAMES,
};
pub use schema::{HarmonizerConfig, DEFAULT_CONFIG_TEMPLATE};
pub use validator::{validate, validate_config, ValidationError};
