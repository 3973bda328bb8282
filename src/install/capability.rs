//! The package installer capability.

use serde::Serialize;

use crate::manifest::{Manifest, PackageSpec};

/// What a single install call covers.
#[derive(Debug, Clone, Copy)]
pub enum InstallTarget<'a> {
    /// Every package of a manifest in one call.
    Manifest(&'a Manifest),
    /// One package.
    Package(&'a PackageSpec),
}

impl InstallTarget<'_> {
    /// Package names covered by the call.
    pub fn package_names(&self) -> Vec<String> {
        match self {
            Self::Manifest(m) => m.names(),
            Self::Package(p) => vec![p.name.clone()],
        }
    }
}

/// Installer flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstallOptions {
    /// Install over whatever is present, tolerating partial installs.
    pub ignore_installed: bool,
    /// Do not resolve dependencies.
    pub no_deps: bool,
    /// Reinstall even if the requirement is already satisfied.
    pub force_reinstall: bool,
    /// Bypass the installer's download cache.
    pub no_cache: bool,
}

impl InstallOptions {
    /// Plain install.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Weaker success criterion for the retry bulk stage.
    pub fn tolerant() -> Self {
        Self {
            ignore_installed: true,
            ..Self::default()
        }
    }

    /// Forced single-package reinstall used by verification repair.
    pub fn repair() -> Self {
        Self {
            ignore_installed: false,
            no_deps: true,
            force_reinstall: true,
            no_cache: true,
        }
    }

    /// Short human-readable flag list, empty for [`InstallOptions::standard`].
    pub fn describe(&self) -> String {
        let mut flags = Vec::new();
        if self.ignore_installed {
            flags.push("ignore-installed");
        }
        if self.no_deps {
            flags.push("no-deps");
        }
        if self.force_reinstall {
            flags.push("force-reinstall");
        }
        if self.no_cache {
            flags.push("no-cache");
        }
        flags.join(", ")
    }
}

/// Result of one install call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub success: bool,
    pub detail: String,
}

impl InstallOutcome {
    pub fn succeeded(detail: impl Into<String>) -> Self {
        Self {
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: detail.into(),
        }
    }
}

/// Installs packages. Calls block until the installer finishes.
pub trait Installer {
    fn install(&self, target: InstallTarget<'_>, options: &InstallOptions) -> InstallOutcome;
}
