//! Staged install plans.

use serde::Serialize;

use crate::error::{ProvisionError, Result};
use crate::manifest::{Manifest, PackageSpec};

use super::capability::{InstallOptions, InstallTarget};

/// One attempt to reach the target state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStage {
    /// Install every package of the manifest at once.
    Bulk {
        manifest: Manifest,
        options: InstallOptions,
    },
    /// Install a single package.
    Itemized {
        package: PackageSpec,
        options: InstallOptions,
    },
}

impl InstallStage {
    pub fn bulk(manifest: Manifest, options: InstallOptions) -> Self {
        Self::Bulk { manifest, options }
    }

    pub fn itemized(package: PackageSpec, options: InstallOptions) -> Self {
        Self::Itemized { package, options }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, Self::Bulk { .. })
    }

    pub fn options(&self) -> &InstallOptions {
        match self {
            Self::Bulk { options, .. } | Self::Itemized { options, .. } => options,
        }
    }

    /// The installer call this stage makes.
    pub fn target(&self) -> InstallTarget<'_> {
        match self {
            Self::Bulk { manifest, .. } => InstallTarget::Manifest(manifest),
            Self::Itemized { package, .. } => InstallTarget::Package(package),
        }
    }

    /// Package names this stage installs.
    pub fn package_names(&self) -> Vec<String> {
        self.target().package_names()
    }

    /// Human-readable summary, e.g. `bulk install of default manifest (12 packages)`.
    pub fn describe(&self) -> String {
        let base = match self {
            Self::Bulk { manifest, .. } => format!(
                "bulk install of {} manifest ({} packages)",
                manifest.label(),
                manifest.len()
            ),
            Self::Itemized { package, .. } => format!("install {}", package),
        };
        let flags = self.options().describe();
        if flags.is_empty() {
            base
        } else {
            format!("{} [{}]", base, flags)
        }
    }
}

/// Serializable view of a stage for plan output.
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub index: usize,
    pub kind: &'static str,
    pub description: String,
    pub packages: Vec<String>,
    pub options: InstallOptions,
}

/// Ordered install stages.
///
/// Stage 0 is always a bulk install of the whole selected manifest. Later
/// stages only run when stage 0 fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    stages: Vec<InstallStage>,
}

impl InstallPlan {
    /// Build a plan from explicit stages.
    pub fn new(stages: Vec<InstallStage>) -> Result<Self> {
        match stages.first() {
            None => Err(ProvisionError::InvalidPlan {
                message: "a plan needs at least one stage".to_string(),
            }),
            Some(first) if !first.is_bulk() => Err(ProvisionError::InvalidPlan {
                message: "stage 0 must be a bulk install of the manifest".to_string(),
            }),
            Some(_) => Ok(Self { stages }),
        }
    }

    /// The standard escalation plan.
    ///
    /// 1. Bulk install of the manifest.
    /// 2. One itemized stage per escalation package, pinned as the manifest
    ///    pins it.
    /// 3. Bulk install again, ignoring what is already installed.
    pub fn staged(manifest: &Manifest, escalation: &[String]) -> Self {
        let mut stages = vec![InstallStage::bulk(
            manifest.clone(),
            InstallOptions::standard(),
        )];
        stages.extend(escalation.iter().map(|name| {
            InstallStage::itemized(manifest.spec_for(name), InstallOptions::standard())
        }));
        stages.push(InstallStage::bulk(
            manifest.clone(),
            InstallOptions::tolerant(),
        ));
        Self { stages }
    }

    pub fn stages(&self) -> &[InstallStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The primary bulk stage.
    pub fn primary(&self) -> &InstallStage {
        &self.stages[0]
    }

    /// Serializable stage list.
    pub fn views(&self) -> Vec<StageView> {
        self.stages
            .iter()
            .enumerate()
            .map(|(index, stage)| StageView {
                index,
                kind: if stage.is_bulk() { "bulk" } else { "itemized" },
                description: stage.describe(),
                packages: stage.package_names(),
                options: *stage.options(),
            })
            .collect()
    }
}
