//! Runtime version tokens.
//!
//! A [`Version`] is a `major.minor` pair. A [`RuntimeVersion`] is what the
//! detector hands to manifest selection: either a known version or
//! `Unknown` when the runtime's self-report contained no usable token.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ProvisionError;

/// First `N.N` substring anywhere in a version report.
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").expect("VERSION_TOKEN must compile"));

/// A normalized `major.minor` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Extract the first `major.minor` token from arbitrary text.
    ///
    /// `"Python 3.12.4"` yields `3.12`. Returns `None` when the text has no
    /// such token or a component overflows.
    pub fn extract(text: &str) -> Option<Self> {
        let caps = VERSION_TOKEN.captures(text)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { major, minor })
    }

    /// The previous minor release, saturating at `major.0`.
    pub fn previous_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor.saturating_sub(1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = ProvisionError;

    /// Parse a strict `major.minor` string, as written in configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ProvisionError::ConfigValidationError {
            message: format!("'{}' is not a major.minor version (quote it in YAML)", s),
        };

        let (major, minor) = trimmed.split_once('.').ok_or_else(invalid)?;
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for Version {
    type Error = ProvisionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// The version of the active runtime, as seen by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeVersion {
    /// A `major.minor` token was found.
    Known(Version),
    /// The runtime's report had no recognizable version.
    Unknown,
}

impl RuntimeVersion {
    /// Build a known runtime version.
    pub const fn known(major: u32, minor: u32) -> Self {
        Self::Known(Version::new(major, minor))
    }

    /// The known version, if any.
    pub fn version(&self) -> Option<Version> {
        match self {
            Self::Known(v) => Some(*v),
            Self::Unknown => None,
        }
    }

    /// Whether detection failed.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{}", v),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for RuntimeVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
