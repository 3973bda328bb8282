//! Runtime version detection.
//!
//! - [`version`] - `major.minor` tokens and the detected [`RuntimeVersion`]
//! - [`detector`] - the [`RuntimeProbe`] capability and [`VersionDetector`]

pub mod detector;
pub mod version;

pub use detector::{parse_runtime_version, PythonRuntime, RuntimeProbe, VersionDetector};
pub use version::{RuntimeVersion, Version};
