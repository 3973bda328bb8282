//! Final tally of verification results.

use serde::Serialize;

use crate::error::ProvisionError;

use super::engine::VerificationResult;

/// Pass/fail tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Packages that import, repaired ones included.
    pub installed_count: usize,
    pub repaired_count: usize,
    pub failed_names: Vec<String>,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed_names.is_empty()
    }

    /// Process exit status for this summary.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Failed packages as diagnostics.
    pub fn errors(&self) -> Vec<ProvisionError> {
        self.failed_names
            .iter()
            .map(|name| ProvisionError::PackageUnverifiable {
                package: name.clone(),
            })
            .collect()
    }
}

/// Aggregates results into a [`Summary`].
pub struct SummaryReporter;

impl SummaryReporter {
    pub fn summarize(results: &[VerificationResult]) -> Summary {
        results.iter().fold(Summary::default(), |mut summary, r| {
            if r.is_failed() {
                summary.failed_names.push(r.name.clone());
            } else {
                summary.installed_count += 1;
                if r.is_repaired() {
                    summary.repaired_count += 1;
                }
            }
            summary
        })
    }
}
