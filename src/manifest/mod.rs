//! Dependency manifests and their selection.
//!
//! # Modules
//!
//! - [`spec`] - Package specifications and version constraints
//! - [`model`] - The [`Manifest`] type and requirements-file parsing
//! - [`selector`] - Version-driven choice between the manifests
//! - [`catalog`] - Loading the configured manifest sources

pub mod catalog;
pub mod model;
pub mod selector;
pub mod spec;

pub use catalog::ManifestCatalog;
pub use model::Manifest;
pub use selector::{ManifestKind, ManifestSelector, Selection, SelectionRule};
pub use spec::{normalize_name, PackageSpec, VersionConstraint};
