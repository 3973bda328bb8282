//! Manifest selection by runtime version.
//!
//! Selection is a total function over three rules, checked most specific
//! first:
//!
//! 1. the newest supported version gets the `compat` manifest;
//! 2. any other supported version gets the `default` manifest;
//! 3. older or undetected versions get the `default` manifest plus an
//!    advisory.
//!
//! The selector only looks at the version it is given.

use serde::Serialize;
use std::fmt;

use crate::runtime::{RuntimeVersion, Version};

/// Which configured manifest to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestKind {
    /// General-purpose manifest.
    Default,
    /// Manifest tuned for the newest supported runtime.
    Compat,
}

impl ManifestKind {
    /// Label used in config, logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Compat => "compat",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which selection rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Exact match on the newest supported version.
    NewestSupported,
    /// Within the supported range.
    Supported,
    /// Older than the oldest supported version, or unknown.
    Unsupported,
}

/// Outcome of manifest selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Manifest to install.
    pub kind: ManifestKind,
    /// Rule that produced the choice.
    pub rule: SelectionRule,
    /// Version assumed when detection failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_version: Option<Version>,
    /// Advisory for unsupported or undetected versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// Maps a runtime version to a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestSelector {
    newest_supported: Version,
    oldest_supported: Version,
}

impl ManifestSelector {
    /// Create a selector for the supported range `oldest..=newest`.
    pub fn new(newest_supported: Version, oldest_supported: Version) -> Self {
        Self {
            newest_supported,
            oldest_supported,
        }
    }

    pub fn newest_supported(&self) -> Version {
        self.newest_supported
    }

    pub fn oldest_supported(&self) -> Version {
        self.oldest_supported
    }

    /// Version assumed when detection fails: one minor below the newest.
    pub fn conservative_version(&self) -> Version {
        self.newest_supported.previous_minor()
    }

    /// Select the manifest for `version`.
    pub fn select(&self, version: RuntimeVersion) -> Selection {
        match version {
            RuntimeVersion::Known(v) if v == self.newest_supported => Selection {
                kind: ManifestKind::Compat,
                rule: SelectionRule::NewestSupported,
                assumed_version: None,
                advisory: None,
            },
            RuntimeVersion::Known(v) if v >= self.oldest_supported => Selection {
                kind: ManifestKind::Default,
                rule: SelectionRule::Supported,
                assumed_version: None,
                advisory: None,
            },
            RuntimeVersion::Known(v) => Selection {
                kind: ManifestKind::Default,
                rule: SelectionRule::Unsupported,
                assumed_version: None,
                advisory: Some(format!(
                    "Python {} is not supported (oldest supported is {}); using the default manifest",
                    v, self.oldest_supported
                )),
            },
            RuntimeVersion::Unknown => {
                let assumed = self.conservative_version();
                Selection {
                    kind: ManifestKind::Default,
                    rule: SelectionRule::Unsupported,
                    assumed_version: Some(assumed),
                    advisory: Some(format!(
                        "Could not determine the Python version; assuming {} and using the default manifest",
                        assumed
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ManifestSelector {
        ManifestSelector::new(Version::new(3, 13), Version::new(3, 10))
    }

    #[test]
    fn newest_supported_selects_compat() {
        let selection = selector().select(RuntimeVersion::known(3, 13));
        assert_eq!(selection.kind, ManifestKind::Compat);
        assert_eq!(selection.rule, SelectionRule::NewestSupported);
        assert!(selection.advisory.is_none());
    }

    #[test]
    fn versions_in_range_select_default() {
        for minor in 10..13 {
            let selection = selector().select(RuntimeVersion::known(3, minor));
            assert_eq!(selection.kind, ManifestKind::Default, "3.{minor}");
            assert_eq!(selection.rule, SelectionRule::Supported);
            assert!(selection.advisory.is_none());
        }
    }

    #[test]
    fn oldest_supported_is_inclusive() {
        let selection = selector().select(RuntimeVersion::known(3, 10));
        assert_eq!(selection.kind, ManifestKind::Default);
        assert_eq!(selection.rule, SelectionRule::Supported);
        assert!(selection.advisory.is_none());
        assert!(selection.assumed_version.is_none());
    }

    #[test]
    fn newer_than_newest_selects_default_without_advisory() {
        let selection = selector().select(RuntimeVersion::known(3, 14));
        assert_eq!(selection.kind, ManifestKind::Default);
        assert!(selection.advisory.is_none());
    }

    #[test]
    fn older_version_selects_default_with_advisory() {
        let selection = selector().select(RuntimeVersion::known(3, 9));
        assert_eq!(selection.kind, ManifestKind::Default);
        assert_eq!(selection.rule, SelectionRule::Unsupported);
        let advisory = selection.advisory.unwrap();
        assert!(advisory.contains("3.9"));
        assert!(advisory.contains("not supported"));
    }

    #[test]
    fn unknown_assumes_conservative_version() {
        let selection = selector().select(RuntimeVersion::Unknown);
        assert_eq!(selection.kind, ManifestKind::Default);
        assert_eq!(selection.rule, SelectionRule::Unsupported);
        assert_eq!(selection.assumed_version, Some(Version::new(3, 12)));
        assert!(selection.advisory.unwrap().contains("3.12"));
    }

    #[test]
    fn compat_rule_is_not_shadowed_when_range_collapses() {
        let selector = ManifestSelector::new(Version::new(3, 12), Version::new(3, 12));
        assert_eq!(
            selector.select(RuntimeVersion::known(3, 12)).kind,
            ManifestKind::Compat
        );
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ManifestKind::Default.to_string(), "default");
        assert_eq!(ManifestKind::Compat.label(), "compat");
    }
}
