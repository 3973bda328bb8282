//! Provision - install and verify a project's Python dependencies.
//!
//! Provision detects the interpreter version, picks the matching
//! requirements manifest, installs it with a staged fallback when the bulk
//! install fails, and then checks that a set of critical packages actually
//! import, repairing them once if they do not.
//!
//! # Modules
//!
//! - [`runtime`] - Interpreter version detection
//! - [`manifest`] - Manifest model, loading, and version-based selection
//! - [`install`] - Install plans, the pip installer, and the staged orchestrator
//! - [`verify`] - Import verification, repair, and the summary
//! - [`pipeline`] - The end-to-end provisioning run
//! - [`config`] - Configuration loading, merging, and validation
//! - [`cli`] - Command-line interface and argument parsing
//! - [`shell`] - Child process execution
//! - [`ui`] - Spinners and terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use provision::manifest::{ManifestKind, ManifestSelector};
//! use provision::runtime::{RuntimeVersion, Version};
//!
//! let selector = ManifestSelector::new(Version::new(3, 13), Version::new(3, 10));
//! let selection = selector.select(RuntimeVersion::Known(Version::new(3, 13)));
//! assert_eq!(selection.kind, ManifestKind::Compat);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod manifest;
pub mod pipeline;
pub mod runtime;
pub mod shell;
pub mod ui;
pub mod verify;

pub use error::{ProvisionError, Result};
