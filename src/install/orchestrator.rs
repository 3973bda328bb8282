//! Runs an install plan.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ProvisionError;

use super::capability::Installer;
use super::plan::InstallPlan;

/// What happened to one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Succeeded,
    Failed { detail: String },
    /// Not run because the stage at `satisfied_by` already succeeded.
    Skipped { satisfied_by: usize },
}

/// Outcome record for one stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub index: usize,
    pub description: String,
    pub packages: Vec<String>,
    #[serde(flatten)]
    pub status: StageStatus,
}

impl StageRecord {
    pub fn is_attempted(&self) -> bool {
        !matches!(self.status, StageStatus::Skipped { .. })
    }
}

/// Per-stage results of an orchestrated install.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub stages: Vec<StageRecord>,
}

impl InstallReport {
    /// Number of installer calls made.
    pub fn attempted(&self) -> usize {
        self.stages.iter().filter(|s| s.is_attempted()).count()
    }

    /// Whether the primary bulk stage succeeded.
    pub fn primary_succeeded(&self) -> bool {
        self.stages
            .first()
            .is_some_and(|s| s.status == StageStatus::Succeeded)
    }

    /// Stage failures as diagnostics.
    pub fn failures(&self) -> Vec<ProvisionError> {
        self.stages
            .iter()
            .filter_map(|s| match &s.status {
                StageStatus::Failed { detail } => Some(ProvisionError::InstallStageFailed {
                    stage: s.description.clone(),
                    detail: detail.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Packages whose own stage was skipped because an earlier stage covered them.
    pub fn skipped_packages(&self) -> BTreeSet<String> {
        self.stages
            .iter()
            .filter(|s| !s.is_attempted())
            .flat_map(|s| s.packages.iter().cloned())
            .collect()
    }
}

/// Executes install plans against an [`Installer`].
///
/// When stage 0 succeeds every later stage is skipped. Otherwise every
/// remaining stage runs in order, each failure is recorded, and nothing
/// is propagated; verification decides whether the environment is usable.
pub struct InstallOrchestrator<'a> {
    installer: &'a dyn Installer,
}

impl<'a> InstallOrchestrator<'a> {
    pub fn new(installer: &'a dyn Installer) -> Self {
        Self { installer }
    }

    pub fn run(&self, plan: &InstallPlan) -> InstallReport {
        let mut report = InstallReport::default();
        let mut satisfied_by: Option<usize> = None;

        for (index, stage) in plan.stages().iter().enumerate() {
            let description = stage.describe();
            let packages = stage.package_names();

            if let Some(done) = satisfied_by {
                debug!(stage = index, "Skipping: {}", description);
                report.stages.push(StageRecord {
                    index,
                    description,
                    packages,
                    status: StageStatus::Skipped { satisfied_by: done },
                });
                continue;
            }

            info!(stage = index, "Running {}", description);
            let outcome = self.installer.install(stage.target(), stage.options());

            let status = if outcome.success {
                if index == 0 {
                    satisfied_by = Some(0);
                }
                StageStatus::Succeeded
            } else {
                let diagnostic = ProvisionError::InstallStageFailed {
                    stage: description.clone(),
                    detail: outcome.detail.clone(),
                };
                warn!("{}", diagnostic);
                StageStatus::Failed {
                    detail: outcome.detail,
                }
            };

            report.stages.push(StageRecord {
                index,
                description,
                packages,
                status,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::capability::{InstallOptions, InstallOutcome, InstallTarget};
    use crate::manifest::{Manifest, PackageSpec};
    use std::cell::RefCell;

    /// Records every call and fails the ones whose names are listed.
    struct RecordingInstaller {
        calls: RefCell<Vec<(Vec<String>, InstallOptions)>>,
        fail_bulk: bool,
        fail_packages: Vec<String>,
    }

    impl RecordingInstaller {
        fn new(fail_bulk: bool, fail_packages: &[&str]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_bulk,
                fail_packages: fail_packages.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Installer for RecordingInstaller {
        fn install(&self, target: InstallTarget<'_>, options: &InstallOptions) -> InstallOutcome {
            self.calls.borrow_mut().push((target.package_names(), *options));
            let failed = match target {
                InstallTarget::Manifest(_) => self.fail_bulk,
                InstallTarget::Package(p) => self.fail_packages.contains(&p.name),
            };
            if failed {
                InstallOutcome::failed("resolution impossible")
            } else {
                InstallOutcome::succeeded("installed")
            }
        }
    }

    fn plan() -> InstallPlan {
        let manifest = Manifest::new(
            "default",
            vec![
                PackageSpec::exact("numpy", "1.26.4"),
                PackageSpec::unconstrained("django"),
                PackageSpec::unconstrained("qiskit"),
            ],
        )
        .unwrap();
        InstallPlan::staged(&manifest, &["numpy".to_string(), "qiskit".to_string()])
    }

    #[test]
    fn primary_success_makes_exactly_one_call() {
        let installer = RecordingInstaller::new(false, &[]);
        let report = InstallOrchestrator::new(&installer).run(&plan());

        assert_eq!(installer.call_count(), 1);
        assert_eq!(report.attempted(), 1);
        assert!(report.primary_succeeded());
        assert!(report.failures().is_empty());
        assert_eq!(report.stages.len(), 4);
        assert!(report.stages[1..]
            .iter()
            .all(|s| s.status == StageStatus::Skipped { satisfied_by: 0 }));
        assert!(report.skipped_packages().contains("qiskit"));
    }

    #[test]
    fn primary_failure_runs_every_remaining_stage() {
        let installer = RecordingInstaller::new(true, &[]);
        let report = InstallOrchestrator::new(&installer).run(&plan());

        assert_eq!(installer.call_count(), 4);
        assert_eq!(report.attempted(), 4);
        assert!(!report.primary_succeeded());
        assert_eq!(report.failures().len(), 2);

        let calls = installer.calls.borrow();
        assert_eq!(calls[1].0, vec!["numpy"]);
        assert_eq!(calls[2].0, vec!["qiskit"]);
        assert_eq!(calls[3].1, InstallOptions::tolerant());
    }

    #[test]
    fn later_failures_do_not_stop_the_plan() {
        let installer = RecordingInstaller::new(true, &["numpy"]);
        let report = InstallOrchestrator::new(&installer).run(&plan());

        assert_eq!(installer.call_count(), 4);
        assert_eq!(report.stages[2].status, StageStatus::Succeeded);
        let failures = report.failures();
        assert_eq!(failures.len(), 3);
        assert!(failures
            .iter()
            .all(|e| matches!(e, ProvisionError::InstallStageFailed { .. })));
    }

    #[test]
    fn report_serializes_status_inline() {
        let installer = RecordingInstaller::new(false, &[]);
        let report = InstallOrchestrator::new(&installer).run(&plan());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["stages"][0]["status"], "succeeded");
        assert_eq!(json["stages"][1]["status"], "skipped");
        assert_eq!(json["stages"][1]["satisfied_by"], 0);
    }
}
