//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - The supported range must not be inverted
//! - Each manifest needs exactly one of `path` or `packages`
//! - Inline manifest entries must parse
//! - At least one critical package, with unique display names, an
//!   importable module path and a plain version attribute
//! - Escalation entries must be valid package names

use crate::config::schema::{ManifestSource, ProvisionConfig};
use crate::error::{ProvisionError, Result};
use crate::manifest::{Manifest, ManifestKind, PackageSpec};
use crate::verify::{is_identifier, is_module_path};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_versions(config));
    errors.extend(validate_manifest_source(
        ManifestKind::Default,
        &config.manifests.default,
    ));
    errors.extend(validate_manifest_source(
        ManifestKind::Compat,
        &config.manifests.compat,
    ));
    errors.extend(validate_critical_packages(config));
    errors.extend(validate_escalation(config));

    errors
}

/// Validate and fold all errors into one [`ProvisionError`].
pub fn validate(config: &ProvisionConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("[{}] {}", e.rule, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ProvisionError::ConfigValidationError { message })
}

fn validate_versions(config: &ProvisionConfig) -> Vec<ValidationError> {
    let policy = &config.versions;
    if policy.oldest_supported > policy.newest_supported {
        vec![ValidationError::new(
            "inverted-version-range",
            format!(
                "oldest_supported ({}) is newer than newest_supported ({})",
                policy.oldest_supported, policy.newest_supported
            ),
        )]
    } else {
        Vec::new()
    }
}

fn validate_manifest_source(kind: ManifestKind, source: &ManifestSource) -> Vec<ValidationError> {
    match (&source.path, source.packages.is_empty()) {
        (Some(_), false) => vec![ValidationError::new(
            "ambiguous-manifest",
            format!("Manifest '{}' sets both 'path' and 'packages'", kind),
        )],
        (None, true) => vec![ValidationError::new(
            "empty-manifest",
            format!("Manifest '{}' needs either 'path' or 'packages'", kind),
        )],
        (None, false) => match Manifest::from_requirements(kind.label(), &source.packages) {
            Ok(_) => Vec::new(),
            Err(e) => vec![ValidationError::new("invalid-manifest", e.to_string())],
        },
        (Some(_), true) => Vec::new(),
    }
}

fn validate_critical_packages(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.critical_packages.is_empty() {
        errors.push(ValidationError::new(
            "no-critical-packages",
            "At least one critical package is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for pkg in &config.critical_packages {
        if pkg.name.trim().is_empty() || pkg.import.trim().is_empty() {
            errors.push(ValidationError::new(
                "incomplete-critical-package",
                format!(
                    "Critical package '{}' needs both 'name' and 'import'",
                    pkg.name
                ),
            ));
        } else if !is_module_path(&pkg.import) {
            errors.push(ValidationError::new(
                "invalid-import",
                format!(
                    "Critical package '{}': '{}' is not a module path",
                    pkg.name, pkg.import
                ),
            ));
        }
        if !is_identifier(&pkg.version_attr) {
            errors.push(ValidationError::new(
                "invalid-version-attr",
                format!(
                    "Critical package '{}': '{}' is not an attribute name",
                    pkg.name, pkg.version_attr
                ),
            ));
        }
        if !seen.insert(pkg.name.to_lowercase()) {
            errors.push(ValidationError::new(
                "duplicate-critical-package",
                format!("Critical package '{}' is listed more than once", pkg.name),
            ));
        }
    }

    errors
}

fn validate_escalation(config: &ProvisionConfig) -> Vec<ValidationError> {
    config
        .escalation
        .iter()
        .filter_map(|name| match name.parse::<PackageSpec>() {
            Ok(spec) if spec.name == *name => None,
            Ok(_) => Some(ValidationError::new(
                "invalid-escalation",
                format!(
                    "Escalation entry '{}' must be a bare package name; constraints come from the manifest",
                    name
                ),
            )),
            Err(message) => Some(ValidationError::new(
                "invalid-escalation",
                format!("Escalation entry '{}': {}", name, message),
            )),
        })
        .collect()
}
