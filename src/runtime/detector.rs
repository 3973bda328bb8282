//! Runtime version detection.

use tracing::{debug, warn};

use crate::error::ProvisionError;
use crate::shell::{execute, CommandOptions};

use super::version::{RuntimeVersion, Version};

/// Source of the runtime's self-reported version string.
pub trait RuntimeProbe {
    /// Read the raw version report (e.g. `"Python 3.12.4"`).
    ///
    /// Returns an empty string when the runtime could not be queried.
    fn read_runtime_version_string(&self) -> String;
}

/// Probe that asks a Python interpreter for `--version`.
#[derive(Debug, Clone)]
pub struct PythonRuntime {
    python: String,
}

impl PythonRuntime {
    /// Create a probe for the given interpreter.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl RuntimeProbe for PythonRuntime {
    fn read_runtime_version_string(&self) -> String {
        let args = vec!["--version".to_string()];
        match execute(&self.python, &args, &CommandOptions::captured()) {
            // Python 2 and early 3.x print the version on stderr.
            Ok(result) if result.stdout.trim().is_empty() => result.stderr.trim().to_string(),
            Ok(result) => result.stdout.trim().to_string(),
            Err(e) => {
                debug!(python = %self.python, error = %e, "runtime probe failed");
                String::new()
            }
        }
    }
}

/// Turns the probe's report into a [`RuntimeVersion`].
pub struct VersionDetector<'a> {
    probe: &'a dyn RuntimeProbe,
}

impl<'a> VersionDetector<'a> {
    /// Create a detector over a probe.
    pub fn new(probe: &'a dyn RuntimeProbe) -> Self {
        Self { probe }
    }

    /// Detect the runtime version.
    ///
    /// Never fails: a report without a `major.minor` token yields
    /// [`RuntimeVersion::Unknown`] and a logged `DetectionAmbiguous`.
    pub fn detect(&self) -> RuntimeVersion {
        let raw = self.probe.read_runtime_version_string();
        match parse_runtime_version(&raw) {
            Ok(version) => {
                debug!(raw = %raw, version = %version, "runtime version detected");
                RuntimeVersion::Known(version)
            }
            Err(err) => {
                warn!("{}", err);
                RuntimeVersion::Unknown
            }
        }
    }
}

/// Extract the version token, reporting ambiguity as an error value.
pub fn parse_runtime_version(raw: &str) -> Result<Version, ProvisionError> {
    Version::extract(raw).ok_or_else(|| ProvisionError::DetectionAmbiguous {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(&'static str);

    impl RuntimeProbe for FixedProbe {
        fn read_runtime_version_string(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn detects_known_version() {
        let probe = FixedProbe("Python 3.13.0");
        assert_eq!(
            VersionDetector::new(&probe).detect(),
            RuntimeVersion::known(3, 13)
        );
    }

    #[test]
    fn unparseable_report_is_unknown() {
        let probe = FixedProbe("Python (development build)");
        assert_eq!(VersionDetector::new(&probe).detect(), RuntimeVersion::Unknown);
    }

    #[test]
    fn empty_report_is_unknown() {
        let probe = FixedProbe("");
        assert!(VersionDetector::new(&probe).detect().is_unknown());
    }

    #[test]
    fn parse_reports_detection_ambiguous() {
        let err = parse_runtime_version("no digits").unwrap_err();
        assert!(matches!(err, ProvisionError::DetectionAmbiguous { ref raw } if raw == "no digits"));
    }

    #[test]
    fn missing_interpreter_reports_empty_string() {
        let probe = PythonRuntime::new("provision-test-no-such-python");
        assert_eq!(probe.read_runtime_version_string(), "");
    }
}
