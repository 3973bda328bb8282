//! Dependency manifests.
//!
//! A [`Manifest`] is an ordered, immutable list of [`PackageSpec`]s with a
//! label. Manifests are read from requirements-style files or built from
//! inline config entries.

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};

use super::spec::PackageSpec;

/// An ordered set of packages to install together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,
    packages: Vec<PackageSpec>,
}

impl Manifest {
    /// Build a manifest from already-parsed packages.
    ///
    /// Rejects duplicate package names.
    pub fn new(label: impl Into<String>, packages: Vec<PackageSpec>) -> Result<Self> {
        let label = label.into();
        let mut seen = HashSet::new();
        for pkg in &packages {
            if !seen.insert(pkg.normalized_name()) {
                return Err(ProvisionError::ConfigValidationError {
                    message: format!(
                        "Manifest '{}' declares package '{}' more than once",
                        label, pkg.name
                    ),
                });
            }
        }

        Ok(Self {
            label,
            source: None,
            packages,
        })
    }

    /// Build a manifest from inline requirement strings.
    pub fn from_requirements(label: impl Into<String>, requirements: &[String]) -> Result<Self> {
        let label = label.into();
        let packages = requirements
            .iter()
            .map(|req| {
                req.parse::<PackageSpec>()
                    .map_err(|message| ProvisionError::ConfigValidationError {
                        message: format!("Manifest '{}': '{}': {}", label, req, message),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(label, packages)
    }

    /// Parse requirements-file content.
    ///
    /// Blank lines, `#` comments and installer option lines (`-r`,
    /// `--index-url`, ...) are skipped.
    pub fn parse(label: impl Into<String>, content: &str, path: &Path) -> Result<Self> {
        let label = label.into();
        let mut packages = Vec::new();
        let mut seen = HashSet::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();

            if line.is_empty() {
                continue;
            }
            if line.starts_with('-') {
                tracing::debug!(manifest = %label, line = line_no, "skipping option line");
                continue;
            }

            let spec: PackageSpec =
                line.parse()
                    .map_err(|message| ProvisionError::ManifestParseError {
                        path: path.to_path_buf(),
                        line: line_no,
                        message,
                    })?;

            if !seen.insert(spec.normalized_name()) {
                return Err(ProvisionError::ManifestParseError {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("duplicate package '{}'", spec.name),
                });
            }
            packages.push(spec);
        }

        Ok(Self {
            label,
            source: Some(path.to_path_buf()),
            packages,
        })
    }

    /// Load a requirements file from disk.
    pub fn load(label: impl Into<String>, path: &Path) -> Result<Self> {
        let label = label.into();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProvisionError::ManifestNotFound {
                    label: label.clone(),
                    path: path.to_path_buf(),
                }
            } else {
                ProvisionError::Io(e)
            }
        })?;

        Self::parse(label, &content, path)
    }

    /// Manifest label (e.g. `default`, `compat`).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// File the manifest was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Packages in declaration order.
    pub fn packages(&self) -> &[PackageSpec] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Find a package by (normalized) name.
    pub fn find(&self, name: &str) -> Option<&PackageSpec> {
        self.packages.iter().find(|p| p.matches_name(name))
    }

    /// Whether the manifest declares the package.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// The manifest's entry for `name`, or an unconstrained spec when the
    /// package is not declared.
    pub fn spec_for(&self, name: &str) -> PackageSpec {
        self.find(name)
            .cloned()
            .unwrap_or_else(|| PackageSpec::unconstrained(name))
    }

    /// Package names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    /// Requirement strings in declaration order.
    pub fn requirements(&self) -> Vec<String> {
        self.packages.iter().map(PackageSpec::requirement).collect()
    }
}

/// Strip a trailing `#` comment. A `#` only starts a comment at the start
/// of the line or after whitespace, so URL fragments survive.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}
