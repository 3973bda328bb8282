//! `pip`-backed installer.

use std::path::PathBuf;

use tracing::debug;

use crate::shell::{execute, CommandOptions};

use super::capability::{InstallOptions, InstallOutcome, InstallTarget, Installer};

/// Lines of installer output kept as failure detail.
const DETAIL_LINES: usize = 5;

/// Runs `<python> -m pip install`.
#[derive(Debug, Clone)]
pub struct PipInstaller {
    python: String,
    cwd: Option<PathBuf>,
    show_output: bool,
}

impl PipInstaller {
    /// Create an installer for the given interpreter.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            cwd: None,
            show_output: false,
        }
    }

    /// Run pip from this directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Let pip write straight to the terminal instead of capturing output.
    pub fn with_output(mut self, show_output: bool) -> Self {
        self.show_output = show_output;
        self
    }

    /// Interpreter this installer drives.
    pub fn python(&self) -> &str {
        &self.python
    }
}

/// Build the argument list for one install call.
///
/// File-backed manifests are passed with `-r` so installer options inside
/// the file (index URLs, includes) still apply.
pub fn pip_args(target: InstallTarget<'_>, options: &InstallOptions) -> Vec<String> {
    let mut args: Vec<String> = ["-m", "pip", "install", "--disable-pip-version-check"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    if options.ignore_installed {
        args.push("--ignore-installed".to_string());
    }
    if options.no_deps {
        args.push("--no-deps".to_string());
    }
    if options.force_reinstall {
        args.push("--force-reinstall".to_string());
    }
    if options.no_cache {
        args.push("--no-cache-dir".to_string());
    }

    match target {
        InstallTarget::Manifest(manifest) => match manifest.source() {
            Some(path) => {
                args.push("-r".to_string());
                args.push(path.display().to_string());
            }
            None => args.extend(manifest.requirements()),
        },
        InstallTarget::Package(spec) => args.push(spec.requirement()),
    }

    args
}

impl Installer for PipInstaller {
    fn install(&self, target: InstallTarget<'_>, options: &InstallOptions) -> InstallOutcome {
        if let InstallTarget::Manifest(manifest) = target {
            if manifest.is_empty() && manifest.source().is_none() {
                return InstallOutcome::succeeded("nothing to install");
            }
        }

        let args = pip_args(target, options);
        let command_options = CommandOptions {
            cwd: self.cwd.clone(),
            capture_stdout: !self.show_output,
            capture_stderr: !self.show_output,
            ..Default::default()
        };

        match execute(&self.python, &args, &command_options) {
            Ok(result) if result.success => {
                debug!(duration_ms = result.duration.as_millis() as u64, "pip install succeeded");
                InstallOutcome::succeeded("installed")
            }
            Ok(result) => {
                let tail = result.output_tail(DETAIL_LINES);
                let detail = if tail.is_empty() {
                    format!("pip exited with code {:?}", result.exit_code)
                } else {
                    tail
                };
                InstallOutcome::failed(detail)
            }
            Err(e) => InstallOutcome::failed(e.to_string()),
        }
    }
}
