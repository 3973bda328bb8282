//! Status icons shared by every UI.

use crate::install::StageStatus;
use crate::verify::VerificationStatus;

use super::theme::ProvisionTheme;

/// Visual status of a stage or package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Completed successfully.
    Success,
    /// Succeeded after a repair.
    Repaired,
    /// Failed.
    Failed,
    /// Not run.
    Skipped,
    /// Non-fatal warning.
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Repaired => "↻",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Repaired => "[repaired]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &ProvisionTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Repaired => theme.info.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<&VerificationStatus> for StatusKind {
    fn from(status: &VerificationStatus) -> Self {
        match status {
            VerificationStatus::Installed { .. } => Self::Success,
            VerificationStatus::Repaired { .. } => Self::Repaired,
            VerificationStatus::Failed => Self::Failed,
        }
    }
}

impl From<&StageStatus> for StatusKind {
    fn from(status: &StageStatus) -> Self {
        match status {
            StageStatus::Succeeded => Self::Success,
            StageStatus::Failed { .. } => Self::Failed,
            StageStatus::Skipped { .. } => Self::Skipped,
        }
    }
}
