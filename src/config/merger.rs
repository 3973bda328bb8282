//! Layering of YAML configuration documents.
//!
//! `.provision/config.local.yml` is applied on top of
//! `.provision/config.yml` before the result is deserialized.
//!
//! # Merge Rules
//!
//! - Mappings merge key by key, recursively
//! - Sequences (package lists, critical packages) are replaced whole
//! - A `null` value in the overlay removes the key, restoring the default
//! - An empty overlay document changes nothing

use serde_yaml::{Mapping, Value};

/// Apply `overlay` on top of `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (_, Value::Null) => base.clone(),
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();

            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                    continue;
                }
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }

            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge documents in priority order (last wins).
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Mapping::new()), |acc, config| {
            deep_merge(&acc, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn local_override_changes_one_version_bound() {
        let base = yaml(
            r#"
versions:
  newest_supported: "3.13"
  oldest_supported: "3.10"
"#,
        );
        let overlay = yaml(
            r#"
versions:
  oldest_supported: "3.11"
"#,
        );

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["versions"]["newest_supported"], "3.13");
        assert_eq!(result["versions"]["oldest_supported"], "3.11");
    }

    #[test]
    fn package_lists_are_replaced() {
        let base = yaml("escalation: [numpy, django, qiskit]");
        let overlay = yaml("escalation: [qiskit]");

        let result = deep_merge(&base, &overlay);
        let escalation = result["escalation"].as_sequence().unwrap();

        assert_eq!(escalation.len(), 1);
        assert_eq!(escalation[0], "qiskit");
    }

    #[test]
    fn null_removes_key() {
        let base = yaml("python: /opt/venv/bin/python\napp_name: Analyzer");
        let overlay = yaml("python: null");

        let result = deep_merge(&base, &overlay);

        assert!(result.get("python").is_none());
        assert_eq!(result["app_name"], "Analyzer");
    }

    #[test]
    fn empty_overlay_document_is_ignored() {
        let base = yaml("app_name: Analyzer");
        let result = deep_merge(&base, &Value::Null);
        assert_eq!(result["app_name"], "Analyzer");
    }

    #[test]
    fn manifest_source_merges_recursively() {
        let base = yaml(
            r#"
manifests:
  default:
    path: requirements.txt
  compat:
    path: requirements-py313.txt
"#,
        );
        let overlay = yaml(
            r#"
manifests:
  compat:
    path: requirements-local.txt
"#,
        );

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["manifests"]["default"]["path"], "requirements.txt");
        assert_eq!(result["manifests"]["compat"]["path"], "requirements-local.txt");
    }

    #[test]
    fn merge_configs_applies_in_order() {
        let configs = vec![yaml("a: 1\nb: 2"), yaml("b: 3\nc: 4"), yaml("c: 5")];

        let result = merge_configs(&configs);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 3);
        assert_eq!(result["c"], 5);
    }

    #[test]
    fn merge_no_configs_is_empty_mapping() {
        let result = merge_configs(&[]);
        assert!(result.as_mapping().unwrap().is_empty());
    }
}
