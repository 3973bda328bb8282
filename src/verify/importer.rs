//! The module import capability.

use tracing::debug;

use crate::shell::{execute, CommandOptions};

/// Result of one import attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub ok: bool,
    /// Value of the version attribute, when the module has one.
    pub version: Option<String>,
}

impl ImportOutcome {
    pub fn imported(version: Option<String>) -> Self {
        Self { ok: true, version }
    }

    pub fn failed() -> Self {
        Self {
            ok: false,
            version: None,
        }
    }
}

/// Imports a module in the target runtime and reads its version attribute.
pub trait Importer {
    fn import(&self, module: &str, version_attr: &str) -> ImportOutcome;
}

/// Imports through `<python> -c`.
#[derive(Debug, Clone)]
pub struct PythonImporter {
    python: String,
}

impl PythonImporter {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

/// Prefix of the stdout line carrying the version attribute.
pub const VERSION_MARKER: &str = "__provision_version__=";

/// Inline program that imports `module` and prints its version attribute
/// after [`VERSION_MARKER`].
pub fn import_script(module: &str, version_attr: &str) -> String {
    format!(
        "import {m}; print({marker:?} + str(getattr({m}, {a:?}, '')))",
        m = module,
        a = version_attr,
        marker = VERSION_MARKER
    )
}

/// Version from the last marker line; `None` when absent or empty.
pub fn parse_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(VERSION_MARKER))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Importer for PythonImporter {
    fn import(&self, module: &str, version_attr: &str) -> ImportOutcome {
        let args = vec!["-c".to_string(), import_script(module, version_attr)];
        match execute(&self.python, &args, &CommandOptions::captured()) {
            Ok(result) if result.success => ImportOutcome::imported(parse_version(&result.stdout)),
            Ok(result) => {
                debug!(module, "import failed: {}", result.output_tail(1));
                ImportOutcome::failed()
            }
            Err(e) => {
                debug!(module, "import could not run: {}", e);
                ImportOutcome::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_reads_attribute_with_fallback() {
        assert_eq!(
            import_script("qiskit", "__version__"),
            r#"import qiskit; print("__provision_version__=" + str(getattr(qiskit, "__version__", '')))"#
        );
    }

    #[test]
    fn missing_interpreter_fails_import() {
        let importer = PythonImporter::new("provision-test-no-such-python");
        assert_eq!(importer.import("django", "__version__"), ImportOutcome::failed());
    }

    #[cfg(unix)]
    #[test]
    fn marker_line_is_version() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("fake-python");
        fs::write(&script, "#!/bin/sh\necho '__provision_version__=5.1.2'\necho 'noise'\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let importer = PythonImporter::new(script.display().to_string());
        let outcome = importer.import("django", "__version__");

        assert!(outcome.ok);
        assert_eq!(outcome.version.as_deref(), Some("5.1.2"));
    }

    #[cfg(unix)]
    #[test]
    fn empty_stdout_means_no_version() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("fake-python");
        fs::write(&script, "#!/bin/sh\necho ''\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let outcome = PythonImporter::new(script.display().to_string()).import("nltk", "__version__");
        assert!(outcome.ok);
        assert_eq!(outcome.version, None);
    }

    #[cfg(unix)]
    #[test]
    fn import_banner_is_not_a_version() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("fake-python");
        fs::write(
            &script,
            "#!/bin/sh\necho 'Loading backend plugins'\necho '__provision_version__='\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let outcome =
            PythonImporter::new(script.display().to_string()).import("qiskit", "__version__");
        assert!(outcome.ok);
        assert_eq!(outcome.version, None);
    }

    #[test]
    fn parse_version_reads_marker_only() {
        assert_eq!(parse_version("banner\n__provision_version__=1.2.4\n"), Some("1.2.4".to_string()));
        assert_eq!(parse_version("Loading backend plugins\n\n"), None);
        assert_eq!(parse_version("__provision_version__=\n"), None);
    }
}
