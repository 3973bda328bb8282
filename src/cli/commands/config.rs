//! Config command implementation.
//!
//! The `provision config` command shows the resolved configuration.

use crate::cli::args::ConfigArgs;
use crate::config::ConfigPaths;
use crate::error::{ProvisionError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    context: CommandContext,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(context: CommandContext, args: ConfigArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.context.load_config_for(ui) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };

        // Show config file path(s)
        match &self.context.config_path {
            Some(path) => ui.message(&format!("# {}", path.display())),
            None => {
                let paths = ConfigPaths::discover(&self.context.project_root);
                let existing = paths.all_existing();
                if existing.is_empty() {
                    ui.message("# built-in defaults");
                }
                for path in existing {
                    ui.message(&format!("# {}", path.display()));
                }
            }
        }
        ui.message("");

        if self.args.json {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| ProvisionError::Other(e.into()))?;
            ui.message(&json);
        } else {
            let yaml = serde_yaml::to_string(&config).map_err(|e| ProvisionError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}
