//! Package installation.
//!
//! An [`InstallPlan`] is an ordered list of stages. The
//! [`InstallOrchestrator`] runs stage 0 and stops there on success;
//! otherwise it runs every remaining stage and records each failure.

pub mod capability;
pub mod orchestrator;
pub mod pip;
pub mod plan;

pub use capability::{InstallOptions, InstallOutcome, InstallTarget, Installer};
pub use orchestrator::{InstallOrchestrator, InstallReport, StageRecord, StageStatus};
pub use pip::PipInstaller;
pub use plan::{InstallPlan, InstallStage, StageView};
