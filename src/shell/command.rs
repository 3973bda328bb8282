//! External command execution.
//!
//! The installer, importer and runtime probe all drive the configured
//! interpreter as a child process. Arguments are passed directly to the
//! program, never through a shell, so package names and inline code need
//! no quoting.

use crate::error::{ProvisionError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// The last `max_lines` non-empty lines of stderr, falling back to
    /// stdout when stderr is empty.
    pub fn output_tail(&self, max_lines: usize) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

impl CommandOptions {
    /// Options that capture both output streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }
}

/// Render a program and its arguments for logs and error messages.
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        if arg.contains(char::is_whitespace) {
            rendered.push_str(&format!("{:?}", arg));
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

/// Execute a program with arguments.
///
/// A non-zero exit is a successful call returning a failed
/// [`CommandResult`]. `Err` means the program could not be started.
pub fn execute(program: &str, args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null());

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!(command = %display_command(program, args), "executing");

    let output = cmd.output().map_err(|e| {
        tracing::debug!(program, error = %e, "spawn failed");
        ProvisionError::CommandFailed {
            command: display_command(program, args),
            code: None,
        }
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn display_command_quotes_whitespace() {
        let rendered = display_command("python3", &args(&["-c", "import sys"]));
        assert_eq!(rendered, "python3 -c \"import sys\"");
    }

    #[test]
    fn output_tail_prefers_stderr() {
        let result = CommandResult::failure(
            Some(1),
            "out\n".to_string(),
            "a\nb\n\nc\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.output_tail(2), "b\nc");
    }

    #[test]
    fn output_tail_falls_back_to_stdout() {
        let result =
            CommandResult::failure(Some(1), "only stdout\n".to_string(), String::new(), Duration::ZERO);
        assert_eq!(result.output_tail(5), "only stdout");
    }

    #[test]
    fn execute_missing_program_is_error() {
        let result = execute(
            "provision-test-no-such-program",
            &[],
            &CommandOptions::captured(),
        );
        assert!(matches!(result, Err(ProvisionError::CommandFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let result = execute("sh", &args(&["-c", "echo hello"]), &CommandOptions::captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command() {
        let result = execute("sh", &args(&["-c", "exit 3"]), &CommandOptions::captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..CommandOptions::captured()
        };

        let result = execute("pwd", &[], &options).unwrap();

        assert!(result.success);
    }
}
