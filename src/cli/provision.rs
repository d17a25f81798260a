//! The provisioning command.

use crate::catalog;
use crate::cli::args::Cli;
use crate::config::{load_settings, Settings};
use crate::error::Result;
use crate::host::{Host, SystemHost};
use crate::session::ProvisioningSession;
use crate::ui::UserInterface;

/// Exit code for settings that cannot be loaded or are invalid.
pub const CONFIG_ERROR_EXIT_CODE: i32 = 2;

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
}

/// Runs the workstation plan as one provisioning session.
pub struct ProvisionCommand {
    settings: Settings,
    dry_run: bool,
}

impl ProvisionCommand {
    pub fn new(settings: Settings, dry_run: bool) -> Self {
        Self { settings, dry_run }
    }

    /// Load settings for the given arguments.
    ///
    /// Errors here are configuration errors and map to
    /// [`CONFIG_ERROR_EXIT_CODE`].
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let settings = load_settings(cli.config.as_deref())?;
        tracing::debug!(?settings, "settings loaded");
        Ok(Self::new(settings, cli.dry_run))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Execute against the real system.
    pub fn execute(&self, ui: &mut dyn UserInterface) -> CommandResult {
        let mut host = SystemHost::new(self.dry_run);
        self.execute_on(ui, &mut host)
    }

    /// Execute against any host.
    pub fn execute_on(&self, ui: &mut dyn UserInterface, host: &mut dyn Host) -> CommandResult {
        let steps = catalog::workstation(&self.settings);
        let mut session = ProvisioningSession::new(self.settings.clone(), steps);
        let report = session.run(ui, host);

        tracing::debug!(
            session = %report.session_id,
            termination = ?report.termination,
            "session finished"
        );

        if report.is_success() {
            CommandResult::success()
        } else {
            CommandResult::failure(report.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command(temp: &TempDir) -> ProvisionCommand {
        let settings = Settings {
            log_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        ProvisionCommand::new(settings, false)
    }

    #[test]
    fn declined_run_succeeds() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::with_input(["n"]);
        let mut host = MockHost::new();

        let result = command(&temp).execute_on(&mut ui, &mut host);
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn unreachable_network_fails_with_one() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let mut host = MockHost::new();
        host.set_unreachable(true);

        let result = command(&temp).execute_on(&mut ui, &mut host);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = Cli {
            config: Some(temp.path().join("nope.yml")),
            dry_run: false,
            no_color: false,
            debug: false,
        };
        assert!(ProvisionCommand::from_cli(&cli).is_err());
    }
}
