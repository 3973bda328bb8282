//! Command-line interface for provision.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, ConfigArgs, PlanArgs, RunArgs, VerifyArgs};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
