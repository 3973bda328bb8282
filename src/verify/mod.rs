//! Post-install verification.
//!
//! Each [`CriticalPackage`] is imported in the target runtime. A failed
//! import gets one forced reinstall and one retry, never more. The
//! [`SummaryReporter`] then reduces the results to a pass/fail tally.

pub mod critical;
pub mod engine;
pub mod importer;
pub mod summary;

pub use critical::{
    default_critical_packages, is_identifier, is_module_path, CriticalPackage, DEFAULT_VERSION_ATTR,
};
pub use engine::{VerificationEngine, VerificationResult, VerificationStatus};
pub use importer::{import_script, parse_version, ImportOutcome, Importer, PythonImporter, VERSION_MARKER};
pub use summary::{Summary, SummaryReporter};
