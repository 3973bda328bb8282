//! Terminal presentation.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use provision::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("myapp");
//! ui.success("Environment ready");
//! ```

pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::{MockSpinner, MockUI, SpinnerEnd};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, ProvisionTheme};

use crate::verify::{Summary, VerificationResult};

/// Trait for user interface interactions.
///
/// Commands talk to this trait so tests can swap in [`MockUI`].
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a `key: value` line.
    fn show_field(&mut self, key: &str, value: &str);

    /// Show a contextual hint.
    fn show_hint(&mut self, hint: &str);

    /// Start a spinner for a blocking operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show the end-of-run verification table.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub name: String,
    pub status: StatusKind,
    /// Version, or `unknown`.
    pub detail: String,
}

/// What the summary table shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: Vec<SummaryRow>,
    pub installed: usize,
    pub repaired: usize,
    pub failed: Vec<String>,
}

impl RunSummary {
    /// Build the table from verification output.
    pub fn from_results(results: &[VerificationResult], summary: &Summary) -> Self {
        Self {
            rows: results
                .iter()
                .map(|r| SummaryRow {
                    name: r.name.clone(),
                    status: StatusKind::from(&r.status),
                    detail: r.version_label().to_string(),
                })
                .collect(),
            installed: summary.installed_count,
            repaired: summary.repaired_count,
            failed: summary.failed_names.clone(),
        }
    }

    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Footer line, e.g. `4 installed · 1 repaired · 0 failed`.
    pub fn totals(&self) -> String {
        format!(
            "{} installed · {} repaired · {} failed",
            self.installed,
            self.repaired,
            self.failed.len()
        )
    }
}
