//! Run command implementation.
//!
//! The `provision run` command drives the whole pipeline: detect the
//! runtime, select and install the manifest, verify the critical packages
//! and print the summary.

use crate::cli::args::RunArgs;
use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::pipeline::{Capabilities, PipelineProgress, ProvisionReport, Provisioner, PythonEnvironment};
use crate::ui::{RunSummary, SpinnerHandle, UserInterface};

use super::dispatcher::{setup_failure, Command, CommandContext, CommandResult};
use super::display::{print_json, show_install_report, show_plan, show_selection};

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Run against explicit capabilities.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        config: &ProvisionConfig,
        capabilities: Capabilities<'_>,
    ) -> Result<CommandResult> {
        let provisioner = Provisioner::new(config, &self.context.project_root, capabilities);

        if self.args.dry_run {
            let preparation = match provisioner.prepare() {
                Ok(p) => p,
                Err(e) => return Ok(setup_failure(ui, &e)),
            };
            if self.args.json {
                print_json(ui, &preparation.report())?;
            } else {
                show_selection(ui, &preparation);
                show_plan(ui, &preparation);
                ui.show_hint("Dry run: nothing was installed");
            }
            return Ok(CommandResult::success());
        }

        if self.args.json {
            let report = match provisioner.run() {
                Ok(r) => r,
                Err(e) => return Ok(setup_failure(ui, &e)),
            };
            print_json(ui, &report)?;
            return Ok(CommandResult::from_exit_code(report.exit_code()));
        }

        ui.show_header(config.app_name.as_deref().unwrap_or("provision"));
        let report = match run_with_spinners(&provisioner, ui) {
            Ok(r) => r,
            Err(e) => return Ok(setup_failure(ui, &e)),
        };
        Ok(finish(ui, &report))
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.context.load_config_for(ui) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };

        let show_output = !self.args.json && ui.output_mode().shows_command_output();
        let python = config.python_or_default();
        let environment = PythonEnvironment::new(&python, &self.context.project_root, show_output);

        self.execute_with(ui, &config, environment.capabilities())
    }
}

fn run_with_spinners(
    provisioner: &Provisioner<'_>,
    ui: &mut dyn UserInterface,
) -> Result<ProvisionReport> {
    let mut spinner: Option<Box<dyn SpinnerHandle>> = None;

    provisioner.run_with_progress(|event| match event {
        PipelineProgress::Prepared { preparation } => show_selection(ui, preparation),
        PipelineProgress::InstallStarting { .. } => {
            spinner = Some(ui.start_spinner("Installing packages"));
        }
        PipelineProgress::InstallFinished { report } => {
            if let Some(mut s) = spinner.take() {
                if report.primary_succeeded() {
                    s.finish_success("Packages installed");
                } else {
                    s.finish_error(&format!(
                        "Bulk install failed; ran {} fallback stages",
                        report.attempted().saturating_sub(1)
                    ));
                }
            }
            if !report.primary_succeeded() && ui.output_mode().shows_detail() {
                show_install_report(ui, report);
            }
        }
        PipelineProgress::VerifyStarting { packages } => {
            spinner = Some(ui.start_spinner(&format!("Verifying {} critical packages", packages)));
        }
        PipelineProgress::VerifyFinished { results } => {
            if let Some(mut s) = spinner.take() {
                let failed = results.iter().filter(|r| r.is_failed()).count();
                if failed == 0 {
                    s.finish_success("Critical packages import");
                } else {
                    s.finish_error(&format!("{} critical packages failed", failed));
                }
            }
        }
    })
}

/// Print the summary table and map the outcome to an exit code.
pub(super) fn finish(ui: &mut dyn UserInterface, report: &ProvisionReport) -> CommandResult {
    ui.show_run_summary(&RunSummary::from_results(&report.results, &report.summary));

    if report.is_success() {
        ui.success(&format!(
            "{} critical packages ready",
            report.summary.installed_count
        ));
    } else {
        for error in report.summary.errors() {
            ui.error(&error.to_string());
        }
        if !ui.output_mode().shows_command_output() {
            ui.show_hint("Re-run with --verbose to see installer output");
        }
    }

    CommandResult::from_exit_code(report.exit_code())
}
