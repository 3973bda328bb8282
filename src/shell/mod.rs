//! Child process execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{display_command, execute, CommandOptions, CommandResult};
pub use platform::{default_python, is_ci};
