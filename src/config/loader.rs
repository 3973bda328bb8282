//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from the
//! project directory in priority order. Running without any configuration
//! file is valid and yields [`ProvisionConfig::default`].

use crate::config::merger::merge_configs;
use crate::config::schema::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".provision";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.provision/config.yml`)
/// 2. Local overrides (`.provision/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .provision/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .provision/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a config file as a raw YAML value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProvisionError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProvisionError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| ProvisionError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a [`ProvisionConfig`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ProvisionConfig> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    from_value(merge_configs(&[value]), source_path)
}

/// Load and merge the project's config files.
///
/// Returns the defaults when the project has no `.provision/config.yml`.
/// A local override without a project config is still applied.
pub fn load_merged_config(project_root: &Path) -> Result<ProvisionConfig> {
    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();

    if existing.is_empty() {
        tracing::debug!(root = %project_root.display(), "no config files, using defaults");
        return Ok(ProvisionConfig::default());
    }

    let mut configs = Vec::new();
    for path in &existing {
        tracing::debug!(path = %path.display(), "loading config");
        configs.push(load_config_value(path)?);
    }

    let merged = merge_configs(&configs);
    from_value(merged, existing[existing.len() - 1])
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging;
/// the file must exist. Otherwise, discovers and merges project files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<ProvisionConfig> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            from_value(merge_configs(&[value]), path)
        }
        None => load_merged_config(project_root),
    }
}

fn from_value(value: serde_yaml::Value, source_path: &Path) -> Result<ProvisionConfig> {
    serde_yaml::from_value(value).map_err(|e| ProvisionError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Version;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        temp
    }

    #[test]
    fn discover_finds_project_config() {
        let temp = setup_project("app_name: test");
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_none());
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(!paths.has_project_config());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn missing_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.critical_packages.len(), 4);
    }

    #[test]
    fn empty_config_file_yields_defaults() {
        let temp = setup_project("");
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.versions.newest_supported, Version::new(3, 13));
    }

    #[test]
    fn local_overrides_are_merged() {
        let temp = setup_project("app_name: Analyzer\npython: python3.12\n");
        fs::write(
            temp.path().join(CONFIG_DIR).join("config.local.yml"),
            "python: /opt/venv/bin/python\n",
        )
        .unwrap();

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Analyzer"));
        assert_eq!(config.python.as_deref(), Some("/opt/venv/bin/python"));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = setup_project("versions: [unclosed");
        let err = load_merged_config(temp.path()).unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigParseError { .. }));
    }

    #[test]
    fn wrong_types_are_parse_error() {
        let temp = setup_project("critical_packages: 7");
        let err = load_merged_config(temp.path()).unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigParseError { .. }));
    }

    #[test]
    fn override_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let err = load_config(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigNotFound { .. }));
    }

    #[test]
    fn override_path_skips_project_files() {
        let temp = setup_project("app_name: Project");
        let other = temp.path().join("other.yml");
        fs::write(&other, "app_name: Other").unwrap();

        let config = load_config(temp.path(), Some(&other)).unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Other"));
    }

    #[test]
    fn parse_config_reads_content() {
        let config = parse_config("escalation: [qiskit]", Path::new("inline.yml")).unwrap();
        assert_eq!(config.escalation, vec!["qiskit"]);
    }
}
