//! Error types for provisioning operations.
//!
//! This module defines [`ProvisionError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration and manifest errors are fatal and stop a run before the
//!   pipeline starts.
//! - Once the pipeline starts, nothing propagates. Detection, install and
//!   verification problems are produced as values (`DetectionAmbiguous`,
//!   `InstallStageFailed`, `PackageUnverifiable`), logged, and reported.
//! - Use `ProvisionError::Other` for unexpected errors from dependencies.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A manifest file referenced by the configuration does not exist.
    #[error("Manifest '{label}' not found: {path}")]
    ManifestNotFound { label: String, path: PathBuf },

    /// A manifest entry could not be parsed.
    #[error("Failed to parse manifest {path} at line {line}: {message}")]
    ManifestParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// An install plan violates its construction invariant.
    #[error("Invalid install plan: {message}")]
    InvalidPlan { message: String },

    /// Shell command could not be run.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The runtime version string contained no `major.minor` token.
    #[error("Could not determine runtime version from {raw:?}")]
    DetectionAmbiguous { raw: String },

    /// A single install stage reported failure.
    #[error("Install stage '{stage}' failed: {detail}")]
    InstallStageFailed { stage: String, detail: String },

    /// A critical package failed its import and its repair attempt.
    #[error("Package '{package}' is not importable after repair")]
    PackageUnverifiable { package: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProvisionError {
    /// Whether this error stops a run before the pipeline starts.
    ///
    /// Pipeline diagnostics are never fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::DetectionAmbiguous { .. }
                | Self::InstallStageFailed { .. }
                | Self::PackageUnverifiable { .. }
        )
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
