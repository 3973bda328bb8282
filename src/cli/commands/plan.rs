//! Plan command implementation.
//!
//! The `provision plan` command detects the runtime, selects the manifest
//! and prints the install plan without running it.

use crate::cli::args::PlanArgs;
use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::pipeline::{Capabilities, Provisioner, PythonEnvironment};
use crate::ui::UserInterface;

use super::dispatcher::{setup_failure, Command, CommandContext, CommandResult};
use super::display::{print_json, show_plan, show_selection};

/// The plan command implementation.
pub struct PlanCommand {
    context: CommandContext,
    args: PlanArgs,
}

impl PlanCommand {
    /// Create a new plan command.
    pub fn new(context: CommandContext, args: PlanArgs) -> Self {
        Self { context, args }
    }

    /// Plan against explicit capabilities.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        config: &ProvisionConfig,
        capabilities: Capabilities<'_>,
    ) -> Result<CommandResult> {
        let provisioner = Provisioner::new(config, &self.context.project_root, capabilities);
        let preparation = match provisioner.prepare() {
            Ok(p) => p,
            Err(e) => return Ok(setup_failure(ui, &e)),
        };

        if self.args.json {
            print_json(ui, &preparation.report())?;
        } else {
            show_selection(ui, &preparation);
            show_plan(ui, &preparation);
        }
        Ok(CommandResult::success())
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.context.load_config_for(ui) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };

        let python = config.python_or_default();
        let environment = PythonEnvironment::new(&python, &self.context.project_root, false);
        self.execute_with(ui, &config, environment.capabilities())
    }
}
