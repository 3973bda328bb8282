//! Shared display helpers.
//!
//! Used by `run`, `verify` and `plan` so the selection, plan and install
//! outcome render the same way everywhere.

use serde::Serialize;

use crate::error::{ProvisionError, Result};
use crate::install::{InstallReport, StageStatus};
use crate::pipeline::Preparation;
use crate::ui::{StatusKind, UserInterface};

/// Show the detected version, the chosen manifest and any advisories.
pub fn show_selection(ui: &mut dyn UserInterface, preparation: &Preparation) {
    ui.show_field("Python", &preparation.version.to_string());
    if let Some(assumed) = preparation.selection.assumed_version {
        ui.show_field("Assuming", &assumed.to_string());
    }

    let manifest = &preparation.manifest;
    let source = match manifest.source() {
        Some(path) => format!(
            "{} ({}, {} packages)",
            manifest.label(),
            path.display(),
            manifest.len()
        ),
        None => format!("{} (inline, {} packages)", manifest.label(), manifest.len()),
    };
    ui.show_field("Manifest", &source);

    if let Some(advisory) = &preparation.selection.advisory {
        ui.warning(advisory);
    }
    for name in &preparation.missing_criticals {
        ui.warning(&format!(
            "Critical package {} is not declared in the {} manifest",
            name,
            manifest.label()
        ));
    }
}

/// List the install plan stages.
pub fn show_plan(ui: &mut dyn UserInterface, preparation: &Preparation) {
    ui.message("");
    ui.message("Install plan:");
    for view in preparation.plan.views() {
        let note = if view.index == 0 {
            ""
        } else {
            "  (only if stage 0 fails)"
        };
        ui.message(&format!("  {}. {}{}", view.index, view.description, note));
    }
}

/// One line per attempted stage after a failed bulk install.
pub fn show_install_report(ui: &mut dyn UserInterface, report: &InstallReport) {
    for stage in report.stages.iter().filter(|s| s.is_attempted()) {
        let kind = StatusKind::from(&stage.status);
        let line = format!("  {} {}", kind.icon(), stage.description);
        match &stage.status {
            StageStatus::Succeeded => ui.message(&line),
            StageStatus::Failed { detail } => {
                ui.warning(&line);
                for detail_line in detail.lines() {
                    ui.show_hint(&format!("    {}", detail_line));
                }
            }
            StageStatus::Skipped { .. } => {}
        }
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(ui: &mut dyn UserInterface, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ProvisionError::Other(e.into()))?;
    ui.message(&json);
    Ok(())
}
