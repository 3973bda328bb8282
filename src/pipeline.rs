//! The provisioning pipeline.
//!
//! Wires the five stages together in strict order:
//! detection, manifest selection, install, verification, summary.
//! Only setup problems (configuration, manifest loading) are returned as
//! errors; once installation starts every stage yields a value.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::install::{
    InstallOrchestrator, InstallPlan, InstallReport, Installer, PipInstaller, StageView,
};
use crate::manifest::{Manifest, ManifestCatalog, ManifestSelector, Selection};
use crate::runtime::{PythonRuntime, RuntimeProbe, RuntimeVersion, VersionDetector};
use crate::verify::{
    CriticalPackage, Importer, PythonImporter, Summary, SummaryReporter, VerificationEngine,
    VerificationResult,
};

/// External capabilities the pipeline drives.
#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
    pub probe: &'a dyn RuntimeProbe,
    pub installer: &'a dyn Installer,
    pub importer: &'a dyn Importer,
}

/// Capabilities backed by a real Python interpreter.
pub struct PythonEnvironment {
    runtime: PythonRuntime,
    installer: PipInstaller,
    importer: PythonImporter,
}

impl PythonEnvironment {
    /// Drive `python`, running pip from `project_root`.
    pub fn new(python: &str, project_root: &Path, show_installer_output: bool) -> Self {
        Self {
            runtime: PythonRuntime::new(python),
            installer: PipInstaller::new(python)
                .with_cwd(project_root)
                .with_output(show_installer_output),
            importer: PythonImporter::new(python),
        }
    }

    pub fn capabilities(&self) -> Capabilities<'_> {
        Capabilities {
            probe: &self.runtime,
            installer: &self.installer,
            importer: &self.importer,
        }
    }
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug)]
pub enum PipelineProgress<'a> {
    /// The manifest has been chosen and loaded.
    Prepared { preparation: &'a Preparation },
    /// The install plan is about to run.
    InstallStarting { stages: usize },
    /// The install plan finished.
    InstallFinished { report: &'a InstallReport },
    /// Verification is about to run.
    VerifyStarting { packages: usize },
    /// Verification finished.
    VerifyFinished { results: &'a [VerificationResult] },
}

/// Everything decided before the installer is invoked.
#[derive(Debug, Clone)]
pub struct Preparation {
    pub version: RuntimeVersion,
    pub selection: Selection,
    pub manifest: Manifest,
    pub plan: InstallPlan,
    /// Critical packages the selected manifest does not declare.
    pub missing_criticals: Vec<String>,
}

impl Preparation {
    /// Serializable form for plan and dry-run output.
    pub fn report(&self) -> PlanReport {
        PlanReport {
            runtime: self.version,
            selection: self.selection.clone(),
            manifest: self.manifest.label().to_string(),
            manifest_source: self.manifest.source().map(Path::to_path_buf),
            packages: self.manifest.requirements(),
            missing_criticals: self.missing_criticals.clone(),
            stages: self.plan.views(),
        }
    }
}

/// What a run would do.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub runtime: RuntimeVersion,
    pub selection: Selection,
    pub manifest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_source: Option<PathBuf>,
    pub packages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_criticals: Vec<String>,
    pub stages: Vec<StageView>,
}

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub runtime: RuntimeVersion,
    pub selection: Selection,
    pub manifest: String,
    /// Absent when installation was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<InstallReport>,
    pub results: Vec<VerificationResult>,
    pub summary: Summary,
    pub generated_at: DateTime<Utc>,
}

impl ProvisionReport {
    pub fn is_success(&self) -> bool {
        self.summary.is_success()
    }

    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }
}

/// Runs the provisioning pipeline for one project.
pub struct Provisioner<'a> {
    config: &'a ProvisionConfig,
    project_root: PathBuf,
    capabilities: Capabilities<'a>,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        config: &'a ProvisionConfig,
        project_root: &Path,
        capabilities: Capabilities<'a>,
    ) -> Self {
        Self {
            config,
            project_root: project_root.to_path_buf(),
            capabilities,
        }
    }

    fn selector(&self) -> ManifestSelector {
        ManifestSelector::new(
            self.config.versions.newest_supported,
            self.config.versions.oldest_supported,
        )
    }

    /// Detect, select and load the manifest, and build the install plan.
    pub fn prepare(&self) -> Result<Preparation> {
        let version = VersionDetector::new(self.capabilities.probe).detect();
        info!(version = %version, "Detected runtime");

        let selection = self.selector().select(version);
        if let Some(advisory) = &selection.advisory {
            warn!("{}", advisory);
        }
        info!(manifest = %selection.kind, "Selected manifest");

        let catalog = ManifestCatalog::new(&self.project_root, self.config.manifests.clone());
        let manifest = catalog.load(selection.kind)?;

        let missing_criticals = missing_criticals(&manifest, &self.config.critical_packages);
        for name in &missing_criticals {
            warn!(package = %name, manifest = %manifest.label(), "Critical package is not declared in the manifest");
        }

        let plan = InstallPlan::staged(&manifest, &self.config.escalation);

        Ok(Preparation {
            version,
            selection,
            manifest,
            plan,
            missing_criticals,
        })
    }

    /// Run the full pipeline.
    pub fn run(&self) -> Result<ProvisionReport> {
        self.run_with_progress(|_| {})
    }

    /// Run the full pipeline, reporting progress.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<ProvisionReport>
    where
        F: FnMut(PipelineProgress<'_>),
    {
        let preparation = self.prepare()?;
        on_progress(PipelineProgress::Prepared {
            preparation: &preparation,
        });

        on_progress(PipelineProgress::InstallStarting {
            stages: preparation.plan.len(),
        });
        let install = InstallOrchestrator::new(self.capabilities.installer).run(&preparation.plan);
        on_progress(PipelineProgress::InstallFinished { report: &install });

        let engine = VerificationEngine::new(self.capabilities.importer, self.capabilities.installer)
            .with_manifest(&preparation.manifest);
        let results = self.verify_with(&engine, &mut on_progress);

        Ok(self.finish(preparation, Some(install), results))
    }

    /// Verify and summarize without installing.
    pub fn verify_only<F>(&self, repair: bool, mut on_progress: F) -> Result<ProvisionReport>
    where
        F: FnMut(PipelineProgress<'_>),
    {
        let preparation = self.prepare()?;
        on_progress(PipelineProgress::Prepared {
            preparation: &preparation,
        });

        let engine = if repair {
            VerificationEngine::new(self.capabilities.importer, self.capabilities.installer)
                .with_manifest(&preparation.manifest)
        } else {
            VerificationEngine::without_repair(self.capabilities.importer)
        };
        let results = self.verify_with(&engine, &mut on_progress);

        Ok(self.finish(preparation, None, results))
    }

    fn verify_with<F>(
        &self,
        engine: &VerificationEngine<'_>,
        on_progress: &mut F,
    ) -> Vec<VerificationResult>
    where
        F: FnMut(PipelineProgress<'_>),
    {
        let criticals = &self.config.critical_packages;
        on_progress(PipelineProgress::VerifyStarting {
            packages: criticals.len(),
        });
        let results = engine.verify(criticals);
        on_progress(PipelineProgress::VerifyFinished { results: &results });
        results
    }

    fn finish(
        &self,
        preparation: Preparation,
        install: Option<InstallReport>,
        results: Vec<VerificationResult>,
    ) -> ProvisionReport {
        let summary = SummaryReporter::summarize(&results);
        info!(
            installed = summary.installed_count,
            failed = summary.failed_names.len(),
            "Provisioning finished"
        );
        for error in summary.errors() {
            warn!("{}", error);
        }

        ProvisionReport {
            runtime: preparation.version,
            selection: preparation.selection,
            manifest: preparation.manifest.label().to_string(),
            install,
            results,
            summary,
            generated_at: Utc::now(),
        }
    }
}

/// Names of critical packages the manifest does not declare.
pub fn missing_criticals(manifest: &Manifest, criticals: &[CriticalPackage]) -> Vec<String> {
    criticals
        .iter()
        .filter(|c| !manifest.contains(c.package_name()))
        .map(|c| c.name.clone())
        .collect()
}
