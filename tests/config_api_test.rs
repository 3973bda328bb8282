//! Integration tests for config module public API.

use provision::config::{
    load_config, load_merged_config, validate, validate_config, ManifestSource, OutputMode,
    ProvisionConfig,
};
use provision::runtime::Version;
use std::fs;
use tempfile::TempDir;

fn setup_project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".provision");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
    temp
}

#[test]
fn public_api_is_accessible() {
    let config = ProvisionConfig::default();
    assert!(validate_config(&config).is_empty());
    let _mode = OutputMode::Verbose;
}

#[test]
fn full_config_workflow() {
    let temp = setup_project(&[(
        "config.yml",
        r#"
app_name: Lab
python: python3.12
versions:
  newest_supported: "3.13"
  oldest_supported: "3.9"
manifests:
  default:
    path: reqs/base.txt
  compat:
    packages: ["django==5.1.2", "qiskit==1.2.4"]
escalation: [qiskit]
"#,
    )]);

    let config = load_merged_config(temp.path()).unwrap();
    validate(&config).unwrap();

    assert_eq!(config.app_name.as_deref(), Some("Lab"));
    assert_eq!(config.versions.oldest_supported, Version::new(3, 9));
    assert_eq!(config.manifests.default, ManifestSource::file("reqs/base.txt"));
    assert_eq!(config.manifests.compat.packages.len(), 2);
    assert_eq!(config.escalation, vec!["qiskit".to_string()]);
}

#[test]
fn local_overrides_project_config() {
    let temp = setup_project(&[
        ("config.yml", "app_name: Lab\npython: python3.11\n"),
        ("config.local.yml", "python: /opt/python/bin/python3\n"),
    ]);

    let config = load_merged_config(temp.path()).unwrap();
    assert_eq!(config.app_name.as_deref(), Some("Lab"));
    assert_eq!(config.python.as_deref(), Some("/opt/python/bin/python3"));
}

#[test]
fn explicit_config_path_skips_discovery() {
    let temp = setup_project(&[("config.yml", "app_name: Discovered\n")]);
    let other = temp.path().join("ci.yml");
    fs::write(&other, "app_name: Explicit\n").unwrap();

    let config = load_config(temp.path(), Some(&other)).unwrap();
    assert_eq!(config.app_name.as_deref(), Some("Explicit"));
}

#[test]
fn missing_explicit_config_is_error() {
    let temp = TempDir::new().unwrap();
    let result = load_config(temp.path(), Some(&temp.path().join("nope.yml")));
    assert!(result.is_err());
}

#[test]
fn inverted_version_range_fails_validation() {
    let temp = setup_project(&[(
        "config.yml",
        "versions:\n  newest_supported: \"3.9\"\n  oldest_supported: \"3.12\"\n",
    )]);

    let config = load_merged_config(temp.path()).unwrap();
    assert!(validate(&config).is_err());
}
