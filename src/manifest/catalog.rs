//! Loading the configured manifests.

use std::path::{Path, PathBuf};

use crate::config::{ManifestSource, ManifestsConfig};
use crate::error::{ProvisionError, Result};

use super::model::Manifest;
use super::selector::ManifestKind;

/// Resolves a [`ManifestKind`] to a loaded [`Manifest`].
///
/// Only the selected manifest is read, so a missing file for the other kind
/// does not matter.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    root: PathBuf,
    sources: ManifestsConfig,
}

impl ManifestCatalog {
    /// Create a catalog; relative paths resolve against `root`.
    pub fn new(root: &Path, sources: ManifestsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            sources,
        }
    }

    /// Configured source for a kind.
    pub fn source(&self, kind: ManifestKind) -> &ManifestSource {
        match kind {
            ManifestKind::Default => &self.sources.default,
            ManifestKind::Compat => &self.sources.compat,
        }
    }

    /// Absolute path of a file-backed manifest.
    pub fn path(&self, kind: ManifestKind) -> Option<PathBuf> {
        self.source(kind).path.as_ref().map(|p| self.root.join(p))
    }

    /// Load the manifest for `kind`.
    pub fn load(&self, kind: ManifestKind) -> Result<Manifest> {
        let source = self.source(kind);
        match self.path(kind) {
            Some(path) => Manifest::load(kind.label(), &path),
            None if !source.packages.is_empty() => {
                Manifest::from_requirements(kind.label(), &source.packages)
            }
            None => Err(ProvisionError::ConfigValidationError {
                message: format!("Manifest '{}' needs either 'path' or 'packages'", kind),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_file_relative_to_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "django\nqiskit\n").unwrap();

        let catalog = ManifestCatalog::new(temp.path(), ManifestsConfig::default());
        let manifest = catalog.load(ManifestKind::Default).unwrap();

        assert_eq!(manifest.label(), "default");
        assert_eq!(manifest.names(), vec!["django", "qiskit"]);
    }

    #[test]
    fn missing_unselected_file_is_irrelevant() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "django\n").unwrap();

        let catalog = ManifestCatalog::new(temp.path(), ManifestsConfig::default());
        assert!(catalog.load(ManifestKind::Default).is_ok());
        assert!(matches!(
            catalog.load(ManifestKind::Compat),
            Err(ProvisionError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn loads_inline_packages() {
        let temp = TempDir::new().unwrap();
        let sources = ManifestsConfig {
            default: ManifestSource::file("requirements.txt"),
            compat: ManifestSource::inline(vec!["qiskit==1.2.4".to_string()]),
        };

        let catalog = ManifestCatalog::new(temp.path(), sources);
        let manifest = catalog.load(ManifestKind::Compat).unwrap();

        assert_eq!(manifest.label(), "compat");
        assert_eq!(manifest.requirements(), vec!["qiskit==1.2.4"]);
        assert!(catalog.path(ManifestKind::Compat).is_none());
    }

    #[test]
    fn empty_source_is_error() {
        let temp = TempDir::new().unwrap();
        let sources = ManifestsConfig {
            default: ManifestSource::default(),
            compat: ManifestSource::default(),
        };
        let catalog = ManifestCatalog::new(temp.path(), sources);
        assert!(catalog.load(ManifestKind::Default).is_err());
    }
}
