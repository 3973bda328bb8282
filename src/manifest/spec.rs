//! Package specifications.
//!
//! A [`PackageSpec`] is one manifest entry: a package name and a
//! [`VersionConstraint`]. Only the three constraint forms the installer
//! stages need are accepted: `name==1.2`, `name>=1.2` and bare `name`.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Valid package name, with optional extras (`name[extra1,extra2]`).
static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?(?:\[[A-Za-z0-9._,\s-]+\])?$")
        .expect("PACKAGE_NAME must compile")
});

/// Characters that start a version operator.
const OPERATOR_CHARS: &[char] = &['=', '<', '>', '!', '~'];

/// Version requirement attached to a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionConstraint {
    /// `==version`
    Exact(String),
    /// `>=version`
    Minimum(String),
    /// Any version.
    Unconstrained,
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "=={}", v),
            Self::Minimum(v) => write!(f, ">={}", v),
            Self::Unconstrained => Ok(()),
        }
    }
}

/// A single installable package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    /// Package name as written, extras included.
    pub name: String,
    /// Version requirement.
    pub constraint: VersionConstraint,
}

impl PackageSpec {
    /// A package with no version requirement.
    pub fn unconstrained(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: VersionConstraint::Unconstrained,
        }
    }

    /// A package pinned to an exact version.
    pub fn exact(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: VersionConstraint::Exact(version.into()),
        }
    }

    /// A package with a minimum version.
    pub fn minimum(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: VersionConstraint::Minimum(version.into()),
        }
    }

    /// Name used for comparisons: extras dropped, lowercased, with `_` and
    /// `.` folded to `-`.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether this spec refers to the given package name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.normalized_name() == normalize_name(name)
    }

    /// The requirement string handed to the installer.
    pub fn requirement(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.constraint)
    }
}

impl Serialize for PackageSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for PackageSpec {
    type Err = String;

    /// Parse one requirement. Environment markers after `;` are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let without_marker = s.split(';').next().unwrap_or_default().trim();
        if without_marker.is_empty() {
            return Err("empty requirement".to_string());
        }

        let (name, rest) = match without_marker.find(OPERATOR_CHARS) {
            Some(idx) => (without_marker[..idx].trim(), without_marker[idx..].trim()),
            None => (without_marker, ""),
        };

        if !PACKAGE_NAME.is_match(name) {
            return Err(format!("invalid package name '{}'", name));
        }

        let constraint = if rest.is_empty() {
            VersionConstraint::Unconstrained
        } else if rest.starts_with("===") {
            return Err("unsupported version operator '==='".to_string());
        } else if let Some(version) = rest.strip_prefix("==") {
            VersionConstraint::Exact(parse_version_text(version)?)
        } else if let Some(version) = rest.strip_prefix(">=") {
            VersionConstraint::Minimum(parse_version_text(version)?)
        } else {
            let op: String = rest.chars().take_while(|c| OPERATOR_CHARS.contains(c)).collect();
            return Err(format!("unsupported version operator '{}'", op));
        };

        Ok(Self {
            name: name.to_string(),
            constraint,
        })
    }
}

/// Fold a package name for comparison.
pub fn normalize_name(name: &str) -> String {
    let base = name.split('[').next().unwrap_or_default().trim();
    base.to_lowercase().replace(['_', '.'], "-")
}

fn parse_version_text(text: &str) -> Result<String, String> {
    let version = text.trim();
    if version.is_empty() {
        return Err("missing version after operator".to_string());
    }
    if version.contains(',') {
        return Err("multiple version specifiers are not supported".to_string());
    }
    if version.contains(char::is_whitespace) {
        return Err(format!("invalid version '{}'", version));
    }
    Ok(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_name() {
        let spec: PackageSpec = "django".parse().unwrap();
        assert_eq!(spec, PackageSpec::unconstrained("django"));
    }

    #[test]
    fn parses_exact_pin() {
        let spec: PackageSpec = "qiskit==1.2.4".parse().unwrap();
        assert_eq!(spec, PackageSpec::exact("qiskit", "1.2.4"));
        assert_eq!(spec.requirement(), "qiskit==1.2.4");
    }

    #[test]
    fn parses_minimum_with_spaces() {
        let spec: PackageSpec = "spacy >= 3.7".parse().unwrap();
        assert_eq!(spec, PackageSpec::minimum("spacy", "3.7"));
        assert_eq!(spec.to_string(), "spacy>=3.7");
    }

    #[test]
    fn drops_environment_marker() {
        let spec: PackageSpec = "numpy>=1.26; python_version >= '3.12'".parse().unwrap();
        assert_eq!(spec, PackageSpec::minimum("numpy", "1.26"));
    }

    #[test]
    fn keeps_extras_in_name() {
        let spec: PackageSpec = "uvicorn[standard]==0.30.0".parse().unwrap();
        assert_eq!(spec.name, "uvicorn[standard]");
        assert_eq!(spec.normalized_name(), "uvicorn");
    }

    #[test]
    fn rejects_unsupported_operators() {
        let err = "requests~=2.31".parse::<PackageSpec>().unwrap_err();
        assert!(err.contains("~="));
        let err = "requests<3".parse::<PackageSpec>().unwrap_err();
        assert!(err.contains("'<'"));
        assert!("requests===2.0".parse::<PackageSpec>().is_err());
    }

    #[test]
    fn rejects_multiple_specifiers() {
        let err = "django>=4.2,<5".parse::<PackageSpec>().unwrap_err();
        assert!(err.contains("multiple"));
    }

    #[test]
    fn rejects_missing_version() {
        assert!("django==".parse::<PackageSpec>().is_err());
    }

    #[test]
    fn rejects_invalid_names() {
        assert!("".parse::<PackageSpec>().is_err());
        assert!("-e .".parse::<PackageSpec>().is_err());
        assert!("==1.0".parse::<PackageSpec>().is_err());
    }

    #[test]
    fn name_matching_is_normalized() {
        let spec = PackageSpec::unconstrained("PyMuPDF");
        assert!(spec.matches_name("pymupdf"));
        let spec = PackageSpec::unconstrained("qiskit_machine_learning");
        assert!(spec.matches_name("qiskit-machine-learning"));
        assert!(!spec.matches_name("qiskit"));
    }

    #[test]
    fn serializes_as_requirement_string() {
        let spec = PackageSpec::exact("django", "5.0");
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"django==5.0\"");
    }
}
