//! Actions: one unit of system mutation.
//!
//! An action owns a description, a [`Fallibility`] class, an optional
//! [`Guard`] and a body. Fallibility is declared, never inferred from the
//! error a body returns: the same failed `dnf install` is fatal in one
//! action and a warning in another.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{Result, SettleError};
use crate::host::{Host, Privilege};
use crate::journal::Journal;
use crate::shell::{quote, CommandResult};
use crate::steps::guard::Guard;

/// What a failure of this action means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallibility {
    /// Failure aborts the session once the enclosing step is closed.
    Fatal,
    /// Failure is logged as a warning and execution continues.
    BestEffort,
}

/// Outcome of running one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    /// The guard held; carries its description.
    Skipped(String),
    /// The body returned an error; carries its message.
    Failed(String),
}

impl ActionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ActionOutcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ActionOutcome::Skipped(_))
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Succeeded => write!(f, "succeeded"),
            ActionOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            ActionOutcome::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Everything an action body may touch.
pub struct ActionContext<'a> {
    host: &'a mut dyn Host,
    journal: Journal<'a>,
    settings: &'a Settings,
    skipped: Option<String>,
}

impl<'a> ActionContext<'a> {
    pub fn new(host: &'a mut dyn Host, journal: Journal<'a>, settings: &'a Settings) -> Self {
        Self {
            host,
            journal,
            settings,
            skipped: None,
        }
    }

    /// Check a guard built from values only known inside the body.
    ///
    /// When it holds, the action reports [`ActionOutcome::Skipped`] with the
    /// guard's description and the body should return without mutating.
    pub fn check_guard(&mut self, guard: &Guard) -> bool {
        let check = guard.check(&mut *self.host);
        if check.satisfied {
            self.skipped = Some(check.description);
        }
        check.satisfied
    }

    pub fn host(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    pub fn journal(&mut self) -> &mut Journal<'a> {
        &mut self.journal
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn dry_run(&self) -> bool {
        self.host.dry_run()
    }

    pub fn info(&mut self, message: impl Into<String>) -> Result<()> {
        self.journal.info(message)
    }

    pub fn warn(&mut self, message: impl Into<String>) -> Result<()> {
        self.journal.warn(message)
    }

    /// Run a mutating command, or describe it in dry-run mode.
    ///
    /// A non-zero exit becomes [`SettleError::CommandFailed`].
    pub fn run(&mut self, command: &str, privilege: Privilege) -> Result<CommandResult> {
        if self.dry_run() {
            self.journal.info(format!("Would run: {}", command))?;
            return Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ));
        }

        self.journal.info(format!("Running: {}", command))?;
        let result = self.host.run(command, privilege)?;
        if !result.success {
            if !result.stderr.trim().is_empty() {
                tracing::warn!(command, stderr = %result.stderr.trim(), "command failed");
            }
            return Err(SettleError::CommandFailed {
                command: command.to_string(),
                code: result.exit_code,
            });
        }
        Ok(result)
    }

    /// Install packages in one `dnf` transaction.
    ///
    /// A failed transaction becomes [`SettleError::PackageAction`].
    pub fn install_packages<S: AsRef<str>>(&mut self, packages: &[S]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = packages.iter().map(|p| quote(p.as_ref())).collect();
        let names = names.join(" ");
        match self.run(&format!("dnf install -y {}", names), Privilege::Root) {
            Ok(_) => Ok(()),
            Err(SettleError::CommandFailed { code, .. }) => Err(SettleError::PackageAction {
                action: format!("install {}", names),
                message: match code {
                    Some(code) => format!("dnf exited with code {}", code),
                    None => "dnf was terminated".to_string(),
                },
            }),
            Err(e) => Err(e),
        }
    }

    pub fn set_hostname(&mut self, name: &str) -> Result<()> {
        if self.dry_run() {
            return self.journal.info(format!("Would set hostname to {}", name));
        }
        self.host.set_hostname(name)?;
        self.journal.success(format!("Hostname set to {}", name))
    }

    pub fn set_login_shell(&mut self, shell: &str) -> Result<()> {
        if self.dry_run() {
            return self
                .journal
                .info(format!("Would change login shell to {}", shell));
        }
        self.host.set_login_shell(shell)?;
        self.journal
            .success(format!("Login shell changed to {} (takes effect at next login)", shell))
    }

    /// Download into memory behind a spinner. Runs in dry-run mode too.
    pub fn fetch(&mut self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let mut spinner = self
            .journal
            .ui()
            .start_spinner(&format!("Downloading {}", url));
        match self.host.fetch(url, timeout) {
            Ok(bytes) => {
                spinner.finish_success(&format!("Downloaded {}", url));
                Ok(bytes)
            }
            Err(e) => {
                spinner.finish_error(&format!("Download failed: {}", url));
                Err(e)
            }
        }
    }

    pub fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        if self.dry_run() {
            return self
                .journal
                .info(format!("Would write {}", path.display()));
        }
        self.host.write_file(path, contents)?;
        self.journal.info(format!("Wrote {}", path.display()))
    }
}

type Body = Box<dyn Fn(&mut ActionContext<'_>) -> Result<()>>;

/// One unit of system mutation.
pub struct Action {
    description: String,
    fallibility: Fallibility,
    guard: Option<Guard>,
    body: Body,
}

impl Action {
    pub fn new<F>(description: impl Into<String>, fallibility: Fallibility, body: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + 'static,
    {
        Self {
            description: description.into(),
            fallibility,
            guard: None,
            body: Box::new(body),
        }
    }

    /// An action whose failure aborts the session.
    pub fn fatal<F>(description: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + 'static,
    {
        Self::new(description, Fallibility::Fatal, body)
    }

    /// An action whose failure is only a warning.
    pub fn best_effort<F>(description: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + 'static,
    {
        Self::new(description, Fallibility::BestEffort, body)
    }

    /// Skip the body whenever `guard` holds.
    pub fn guarded_by(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn fallibility(&self) -> Fallibility {
        self.fallibility
    }

    pub fn is_fatal(&self) -> bool {
        self.fallibility == Fallibility::Fatal
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    /// Check the guard, then run the body.
    ///
    /// Body errors become [`ActionOutcome::Failed`]. Errors that end the
    /// session outright (closed input, an unwritable log) are returned.
    pub fn run(&self, ctx: &mut ActionContext<'_>) -> Result<ActionOutcome> {
        if let Some(guard) = &self.guard {
            let check = guard.check(ctx.host());
            if check.satisfied {
                return self.skip(ctx, check.description);
            }
        }

        ctx.skipped = None;
        match (self.body)(ctx) {
            Ok(()) => match ctx.skipped.take() {
                Some(reason) => self.skip(ctx, reason),
                None => Ok(ActionOutcome::Succeeded),
            },
            Err(e) if e.interrupts_session() => Err(e),
            Err(e) => {
                tracing::debug!(action = %self.description, error = ?e, "action failed");
                Ok(ActionOutcome::Failed(e.to_string()))
            }
        }
    }
}

impl Action {
    fn skip(&self, ctx: &mut ActionContext<'_>, reason: String) -> Result<ActionOutcome> {
        ctx.info(format!("Skipping {}: {}", self.description, reason))?;
        Ok(ActionOutcome::Skipped(reason))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("description", &self.description)
            .field("fallibility", &self.fallibility)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
