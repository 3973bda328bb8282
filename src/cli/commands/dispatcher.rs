//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the global flags every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, validate, ProvisionConfig};
use crate::error::{ProvisionError, Result};
use crate::ui::{OutputMode, UserInterface};

/// Exit code for setup errors that stop a run before it starts.
pub const EXIT_SETUP_ERROR: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result for a finished provisioning run.
    pub fn from_exit_code(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
        }
    }
}

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Project root; manifest paths resolve against it.
    pub project_root: PathBuf,
    /// Explicit config file from `--config`.
    pub config_path: Option<PathBuf>,
    /// Interpreter from `--python` / `PROVISION_PYTHON`.
    pub python: Option<String>,
}

impl CommandContext {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Load, validate and apply overrides.
    pub fn load_config(&self) -> Result<ProvisionConfig> {
        let mut config = load_config(&self.project_root, self.config_path.as_deref())?;
        if let Some(python) = &self.python {
            config.python = Some(python.clone());
        }
        validate(&config)?;
        Ok(config)
    }

    /// Load configuration, reporting failures on the UI.
    ///
    /// Also applies `settings.default_output` when no output flag was given.
    pub fn load_config_for(
        &self,
        ui: &mut dyn UserInterface,
    ) -> std::result::Result<ProvisionConfig, CommandResult> {
        match self.load_config() {
            Ok(config) => {
                if ui.output_mode() == OutputMode::Normal {
                    ui.set_output_mode(config.settings.default_output.into());
                }
                Ok(config)
            }
            Err(e) => Err(setup_failure(ui, &e)),
        }
    }
}

/// Report an error that stopped the run before it started.
///
/// Fatal errors exit with [`EXIT_SETUP_ERROR`]; pipeline diagnostics exit 1.
pub fn setup_failure(ui: &mut dyn UserInterface, error: &ProvisionError) -> CommandResult {
    ui.error(&error.to_string());
    if matches!(
        error,
        ProvisionError::ManifestNotFound { .. } | ProvisionError::ConfigNotFound { .. }
    ) {
        ui.show_hint("Check the paths under 'manifests' in .provision/config.yml");
    }
    if error.is_fatal() {
        CommandResult::failure(EXIT_SETUP_ERROR)
    } else {
        CommandResult::failure(1)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Build the context from parsed global flags.
    pub fn from_cli(cli: &Cli, project_root: PathBuf) -> Self {
        Self::new(CommandContext {
            project_root,
            config_path: cli.config.clone(),
            python: cli.python.clone(),
        })
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.context.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Verify(args)) => {
                super::verify::VerifyCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Plan(args)) => {
                super::plan::PlanCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(self.context.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(self.context.clone(), RunArgs::default()).execute(ui),
        }
    }
}
