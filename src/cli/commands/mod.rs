//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. `run`, `verify` and `plan` also
//! expose `execute_with` so tests can supply their own capabilities.

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod plan;
pub mod run;
pub mod verify;

pub use dispatcher::{
    setup_failure, Command, CommandContext, CommandDispatcher, CommandResult, EXIT_SETUP_ERROR,
};
