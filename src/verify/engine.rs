//! Post-install verification with single-shot repair.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::install::{InstallOptions, InstallTarget, Installer};
use crate::manifest::{Manifest, PackageSpec};

use super::critical::CriticalPackage;
use super::importer::Importer;

/// Verification outcome for one critical package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Imported on the first attempt.
    Installed { version: Option<String> },
    /// Imported after a forced reinstall.
    Repaired { version: Option<String> },
    /// Failed the import and the repair retry.
    Failed,
}

/// Result for one critical package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub name: String,
    #[serde(flatten)]
    pub status: VerificationStatus,
}

impl VerificationResult {
    pub fn is_failed(&self) -> bool {
        self.status == VerificationStatus::Failed
    }

    pub fn is_repaired(&self) -> bool {
        matches!(self.status, VerificationStatus::Repaired { .. })
    }

    /// Reported version, `unknown` when the module exposes none.
    pub fn version_label(&self) -> &str {
        match &self.status {
            VerificationStatus::Installed { version } | VerificationStatus::Repaired { version } => {
                version.as_deref().unwrap_or("unknown")
            }
            VerificationStatus::Failed => "-",
        }
    }
}

/// Checks that each critical package imports, repairing once on failure.
pub struct VerificationEngine<'a> {
    importer: &'a dyn Importer,
    installer: Option<&'a dyn Installer>,
    manifest: Option<&'a Manifest>,
}

impl<'a> VerificationEngine<'a> {
    /// Engine that repairs failed imports through `installer`.
    pub fn new(importer: &'a dyn Importer, installer: &'a dyn Installer) -> Self {
        Self {
            importer,
            installer: Some(installer),
            manifest: None,
        }
    }

    /// Engine that only reports; failed imports are not repaired.
    pub fn without_repair(importer: &'a dyn Importer) -> Self {
        Self {
            importer,
            installer: None,
            manifest: None,
        }
    }

    /// Take repair pins from this manifest.
    pub fn with_manifest(mut self, manifest: &'a Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn verify(&self, criticals: &[CriticalPackage]) -> Vec<VerificationResult> {
        criticals.iter().map(|c| self.verify_one(c)).collect()
    }

    fn verify_one(&self, critical: &CriticalPackage) -> VerificationResult {
        let first = self.importer.import(&critical.import, &critical.version_attr);
        if first.ok {
            debug!(package = %critical.name, "import ok");
            return result(critical, VerificationStatus::Installed { version: first.version });
        }

        let Some(installer) = self.installer else {
            warn!(package = %critical.name, "import failed, repair disabled");
            return result(critical, VerificationStatus::Failed);
        };

        let spec = self.repair_spec(critical);
        info!(package = %critical.name, "import failed, reinstalling {}", spec);
        let repair = installer.install(InstallTarget::Package(&spec), &InstallOptions::repair());
        if !repair.success {
            debug!(package = %critical.name, "repair install failed: {}", repair.detail);
        }

        let retry = self.importer.import(&critical.import, &critical.version_attr);
        if retry.ok {
            info!(package = %critical.name, "repaired");
            return result(critical, VerificationStatus::Repaired { version: retry.version });
        }

        debug!(package = %critical.name, "import still failing after repair");
        result(critical, VerificationStatus::Failed)
    }

    fn repair_spec(&self, critical: &CriticalPackage) -> PackageSpec {
        let name = critical.package_name();
        match self.manifest {
            Some(manifest) => manifest.spec_for(name),
            None => PackageSpec::unconstrained(name),
        }
    }
}

fn result(critical: &CriticalPackage, status: VerificationStatus) -> VerificationResult {
    VerificationResult {
        name: critical.name.clone(),
        status,
    }
}
