//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use provision::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Detecting Python");
//! ui.success("Environment ready");
//!
//! assert!(ui.has_message("Detecting"));
//! assert!(ui.has_success("ready"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, RunSummary, SpinnerHandle, UserInterface};

/// How a spinner ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinnerEnd {
    Success(String),
    Error(String),
    Skipped(String),
}

/// Mock UI that records every call.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    fields: Vec<(String, String)>,
    hints: Vec<String>,
    spinners: Vec<String>,
    spinner_ends: Rc<RefCell<Vec<SpinnerEnd>>>,
    summaries: Vec<RunSummary>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Captured `key: value` lines.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Messages of every spinner that was started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// How each finished spinner ended, in finish order.
    pub fn spinner_ends(&self) -> Vec<SpinnerEnd> {
        self.spinner_ends.borrow().clone()
    }

    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    /// Value of the first field with this key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_field(&mut self, key: &str, value: &str) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            ends: Rc::clone(&self.spinner_ends),
        })
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner returned by [`MockUI`]; records how it finished.
pub struct MockSpinner {
    ends: Rc<RefCell<Vec<SpinnerEnd>>>,
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.ends
            .borrow_mut()
            .push(SpinnerEnd::Success(msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.ends.borrow_mut().push(SpinnerEnd::Error(msg.to_string()));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.ends
            .borrow_mut()
            .push(SpinnerEnd::Skipped(msg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages_by_kind() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.warning("careful");
        ui.error("broken");

        assert!(ui.has_message("hello"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("broken"));
        assert!(ui.successes().is_empty());
    }

    #[test]
    fn captures_fields() {
        let mut ui = MockUI::new();
        ui.show_field("Python", "3.13");
        assert_eq!(ui.field("Python"), Some("3.13"));
        assert_eq!(ui.field("Manifest"), None);
    }

    #[test]
    fn records_spinner_outcomes() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Installing packages");
        spinner.finish_error("Install failed");

        assert_eq!(ui.spinners(), &["Installing packages".to_string()]);
        assert_eq!(
            ui.spinner_ends(),
            vec![SpinnerEnd::Error("Install failed".to_string())]
        );
    }

    #[test]
    fn default_mode_is_normal() {
        assert_eq!(MockUI::new().output_mode(), OutputMode::Normal);
        assert_eq!(
            MockUI::with_mode(OutputMode::Quiet).output_mode(),
            OutputMode::Quiet
        );
    }
}
