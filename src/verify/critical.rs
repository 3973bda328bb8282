//! Critical packages.
//!
//! The fixed set of packages whose successful import defines a working
//! environment. The set is configuration data, never discovered.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Dotted Python module path, e.g. `google.protobuf`.
static MODULE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("MODULE_PATH must compile")
});

/// Single Python identifier.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("IDENTIFIER must compile"));

/// Whether `module` is safe to place in an import statement.
pub fn is_module_path(module: &str) -> bool {
    MODULE_PATH.is_match(module)
}

/// Whether `attr` is a plain attribute name.
pub fn is_identifier(attr: &str) -> bool {
    IDENTIFIER.is_match(attr)
}

/// Default attribute read for a module's version.
pub const DEFAULT_VERSION_ATTR: &str = "__version__";

/// A package verification must import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPackage {
    /// Name shown in reports (e.g. `Qiskit`).
    pub name: String,

    /// Module imported to verify the package (e.g. `qiskit`).
    pub import: String,

    /// Module attribute holding the version.
    #[serde(default = "default_version_attr")]
    pub version_attr: String,

    /// Distribution name reinstalled on repair. Defaults to the import name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl CriticalPackage {
    /// Create a critical package with the default version attribute.
    pub fn new(name: impl Into<String>, import: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import: import.into(),
            version_attr: default_version_attr(),
            package: None,
        }
    }

    /// Distribution name handed to the installer.
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.import)
    }
}

fn default_version_attr() -> String {
    DEFAULT_VERSION_ATTR.to_string()
}

/// The stock critical set: Django, Qiskit, spaCy and NLTK.
pub fn default_critical_packages() -> Vec<CriticalPackage> {
    vec![
        CriticalPackage::new("Django", "django"),
        CriticalPackage::new("Qiskit", "qiskit"),
        CriticalPackage::new("spaCy", "spacy"),
        CriticalPackage::new("NLTK", "nltk"),
    ]
}
