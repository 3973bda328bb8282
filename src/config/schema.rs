//! Configuration schema definitions.
//!
//! This module contains all the struct definitions that map to the YAML
//! configuration file format. Every field has a default, so an empty file
//! (or no file at all) describes the stock provisioning run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::runtime::Version;
use crate::verify::critical::{default_critical_packages, CriticalPackage};

/// Root configuration structure for `.provision/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Application name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Python interpreter used for installs, imports and version detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Global settings
    pub settings: Settings,

    /// Supported runtime range
    pub versions: VersionPolicy,

    /// Manifest sources
    pub manifests: ManifestsConfig,

    /// Packages whose import defines a working environment
    pub critical_packages: Vec<CriticalPackage>,

    /// Packages installed one by one after a failed bulk install
    pub escalation: Vec<String>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            python: None,
            settings: Settings::default(),
            versions: VersionPolicy::default(),
            manifests: ManifestsConfig::default(),
            critical_packages: default_critical_packages(),
            escalation: default_escalation(),
        }
    }
}

impl ProvisionConfig {
    /// Interpreter to drive, falling back to the platform default.
    pub fn python_or_default(&self) -> String {
        self.python
            .clone()
            .unwrap_or_else(|| crate::shell::default_python().to_string())
    }
}

/// Global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output mode: verbose, normal, quiet, silent
    pub default_output: OutputMode,
}

/// Output verbosity in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

/// Supported runtime range. Versions are `"major.minor"` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionPolicy {
    /// Newest supported version; selects the `compat` manifest
    pub newest_supported: Version,

    /// Oldest supported version; anything older gets an advisory
    pub oldest_supported: Version,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            newest_supported: Version::new(3, 13),
            oldest_supported: Version::new(3, 10),
        }
    }
}

/// Where each manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestsConfig {
    /// Manifest for every supported version except the newest
    pub default: ManifestSource,

    /// Manifest tuned for the newest supported version
    pub compat: ManifestSource,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        Self {
            default: ManifestSource::file("requirements.txt"),
            compat: ManifestSource::file("requirements-py313.txt"),
        }
    }
}

/// A manifest given either as a requirements file or inline entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSource {
    /// Requirements file, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Inline requirement strings (`name`, `name==x`, `name>=x`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
}

impl ManifestSource {
    /// A file-backed source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            packages: Vec::new(),
        }
    }

    /// An inline source.
    pub fn inline(packages: Vec<String>) -> Self {
        Self {
            path: None,
            packages,
        }
    }
}

fn default_escalation() -> Vec<String> {
    ["numpy", "django", "qiskit", "spacy", "nltk"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
