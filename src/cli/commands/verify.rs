//! Verify command implementation.
//!
//! The `provision verify` command re-checks the critical packages without
//! running the install plan. Repairs still happen unless `--no-repair`.

use crate::cli::args::VerifyArgs;
use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::pipeline::{Capabilities, PipelineProgress, Provisioner, PythonEnvironment};
use crate::ui::{SpinnerHandle, UserInterface};

use super::dispatcher::{setup_failure, Command, CommandContext, CommandResult};
use super::display::{print_json, show_selection};
use super::run::finish;

/// The verify command implementation.
pub struct VerifyCommand {
    context: CommandContext,
    args: VerifyArgs,
}

impl VerifyCommand {
    /// Create a new verify command.
    pub fn new(context: CommandContext, args: VerifyArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &VerifyArgs {
        &self.args
    }

    /// Verify against explicit capabilities.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        config: &ProvisionConfig,
        capabilities: Capabilities<'_>,
    ) -> Result<CommandResult> {
        let provisioner = Provisioner::new(config, &self.context.project_root, capabilities);
        let repair = !self.args.no_repair;

        if self.args.json {
            let report = match provisioner.verify_only(repair, |_| {}) {
                Ok(r) => r,
                Err(e) => return Ok(setup_failure(ui, &e)),
            };
            print_json(ui, &report)?;
            return Ok(CommandResult::from_exit_code(report.exit_code()));
        }

        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;
        let outcome = provisioner.verify_only(repair, |event| match event {
            PipelineProgress::Prepared { preparation } => show_selection(ui, preparation),
            PipelineProgress::VerifyStarting { packages } => {
                spinner = Some(ui.start_spinner(&format!("Verifying {} critical packages", packages)));
            }
            PipelineProgress::VerifyFinished { results } => {
                if let Some(mut s) = spinner.take() {
                    if results.iter().any(|r| r.is_failed()) {
                        s.finish_error("Some critical packages do not import");
                    } else {
                        s.finish_success("Critical packages import");
                    }
                }
            }
            _ => {}
        });

        match outcome {
            Ok(report) => Ok(finish(ui, &report)),
            Err(e) => Ok(setup_failure(ui, &e)),
        }
    }
}

impl Command for VerifyCommand {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManifestSource;
    use crate::install::{InstallOptions, InstallOutcome, InstallTarget, Installer};
    use crate::runtime::RuntimeProbe;
    use crate::ui::MockUI;
    use crate::verify::{ImportOutcome, Importer};
    use std::cell::Cell;
    use tempfile::TempDir;

    struct Probe;

    impl RuntimeProbe for Probe {
        fn read_runtime_version_string(&self) -> String {
            "Python 3.11.9".to_string()
        }
    }

    struct CountingInstaller(Cell<usize>);

    impl Installer for CountingInstaller {
        fn install(&self, _target: InstallTarget<'_>, _options: &InstallOptions) -> InstallOutcome {
            self.0.set(self.0.get() + 1);
            InstallOutcome::succeeded("ok")
        }
    }

    /// Fails `spacy` until the first repair install.
    struct FlakyImporter<'a>(&'a CountingInstaller);

    impl Importer for FlakyImporter<'_> {
        fn import(&self, module: &str, _version_attr: &str) -> ImportOutcome {
            if module == "spacy" && self.0 .0.get() == 0 {
                ImportOutcome::failed()
            } else {
                ImportOutcome::imported(None)
            }
        }
    }

    fn config() -> ProvisionConfig {
        let mut config = ProvisionConfig::default();
        let packages = vec![
            "django".to_string(),
            "qiskit".to_string(),
            "spacy".to_string(),
            "nltk".to_string(),
        ];
        config.manifests.default = ManifestSource::inline(packages.clone());
        config.manifests.compat = ManifestSource::inline(packages);
        config
    }

    fn execute(args: VerifyArgs) -> (CommandResult, MockUI, usize) {
        let temp = TempDir::new().unwrap();
        let cmd = VerifyCommand::new(CommandContext::new(temp.path()), args);
        let installer = CountingInstaller(Cell::new(0));
        let importer = FlakyImporter(&installer);
        let mut ui = MockUI::new();

        let result = cmd
            .execute_with(
                &mut ui,
                &config(),
                Capabilities {
                    probe: &Probe,
                    installer: &installer,
                    importer: &importer,
                },
            )
            .unwrap();
        let calls = installer.0.get();
        (result, ui, calls)
    }

    #[test]
    fn repairs_broken_package() {
        let (result, ui, calls) = execute(VerifyArgs::default());

        assert!(result.success);
        assert_eq!(calls, 1);
        assert_eq!(ui.summaries()[0].repaired, 1);
    }

    #[test]
    fn no_repair_reports_failure() {
        let args = VerifyArgs {
            no_repair: true,
            json: false,
        };
        let (result, ui, calls) = execute(args);

        assert_eq!(result.exit_code, 1);
        assert_eq!(calls, 0);
        assert!(ui.has_error("spaCy"));
    }

    #[test]
    fn json_report_has_no_install_section() {
        let args = VerifyArgs {
            no_repair: false,
            json: true,
        };
        let (result, ui, _) = execute(args);

        assert!(result.success);
        let json: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert!(json["install"].is_null());
        assert_eq!(json["results"][2]["status"], "repaired");
    }
}
