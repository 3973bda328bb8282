//! Configuration loading, parsing, and validation.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layered merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use provision::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".provision");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "app_name: test").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.app_name, Some("test".to_string()));
//! ```
//!
//! # Configuration File Locations
//!
//! Configuration is discovered and merged in this order:
//! 1. Project config (`.provision/config.yml`)
//! 2. Local overrides (`.provision/config.local.yml`)
//!
//! With neither present, the built-in defaults apply.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{
    ManifestSource, ManifestsConfig, OutputMode, ProvisionConfig, Settings, VersionPolicy,
};

pub use loader::{
    load_config, load_config_value, load_merged_config, parse_config, ConfigPaths, CONFIG_DIR,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};
