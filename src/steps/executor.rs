//! Step execution engine.
//!
//! Runs a step's actions in order inside a `Starting step` / `Finished step`
//! bracket. The bracket is closed whatever happens inside it, so every
//! opening entry in the log has exactly one closing entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::error::{Result, SettleError};
use crate::host::Host;
use crate::journal::Journal;
use crate::steps::action::{Action, ActionContext, ActionOutcome, Fallibility};
use crate::steps::{Step, StepBody};

/// Final status of an executed (or declined) step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Every action succeeded or was skipped.
    Completed,

    /// Every action was skipped by its guard.
    Skipped,

    /// At least one best-effort action failed.
    CompletedWithWarnings,

    /// A fatal action failed.
    Failed,

    /// The user declined the step.
    Declined,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Completed => '✓',
            StepStatus::Skipped => '⊘',
            StepStatus::CompletedWithWarnings => '!',
            StepStatus::Failed => '✗',
            StepStatus::Declined => '-',
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
            StepStatus::CompletedWithWarnings => "completed with warnings",
            StepStatus::Failed => "failed",
            StepStatus::Declined => "declined",
        };
        write!(f, "{}", s)
    }
}

/// Result of executing one bracketed list of actions.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Label used in the bracket entries.
    pub label: String,

    /// Outcome per action, in execution order. Actions after a fatal
    /// failure never ran and are absent.
    pub outcomes: Vec<(String, ActionOutcome)>,

    /// Execution duration.
    pub duration: Duration,

    pub status: StepStatus,
}

impl StepReport {
    /// Derive the status from the outcomes.
    fn new(
        label: &str,
        outcomes: Vec<(String, ActionOutcome)>,
        duration: Duration,
        fatal: bool,
    ) -> Self {
        let status = if fatal {
            StepStatus::Failed
        } else if outcomes.iter().any(|(_, o)| o.is_failed()) {
            StepStatus::CompletedWithWarnings
        } else if !outcomes.is_empty() && outcomes.iter().all(|(_, o)| o.is_skipped()) {
            StepStatus::Skipped
        } else {
            StepStatus::Completed
        };

        Self {
            label: label.to_string(),
            outcomes,
            duration,
            status,
        }
    }

    /// Descriptions of failed actions with their messages.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(desc, outcome)| match outcome {
            ActionOutcome::Failed(msg) => Some((desc.as_str(), msg.as_str())),
            _ => None,
        })
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let status = self.status;
        match status {
            StepStatus::Completed => format!(
                "{} {} ({})",
                status.display_char(),
                self.label,
                format_duration(self.duration)
            ),
            StepStatus::Skipped => {
                format!("{} {} (already done)", status.display_char(), self.label)
            }
            StepStatus::CompletedWithWarnings => {
                let failed = self.failures().count();
                format!(
                    "{} {} ({} action{} failed)",
                    status.display_char(),
                    self.label,
                    failed,
                    if failed == 1 { "" } else { "s" }
                )
            }
            StepStatus::Failed => {
                let error = self
                    .failures()
                    .last()
                    .map(|(_, msg)| msg)
                    .unwrap_or("unknown error");
                format!("{} {} - {}", status.display_char(), self.label, error)
            }
            StepStatus::Declined => format!("{} {}", status.display_char(), self.label),
        }
    }
}

/// Format a duration compactly: `850ms`, `4.2s`, `3m 12s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Runs actions against a host, logging through a journal.
pub struct StepExecutor<'a> {
    host: &'a mut dyn Host,
    journal: Journal<'a>,
    settings: &'a Settings,
}

impl<'a> StepExecutor<'a> {
    pub fn new(host: &'a mut dyn Host, journal: Journal<'a>, settings: &'a Settings) -> Self {
        Self {
            host,
            journal,
            settings,
        }
    }

    pub fn journal(&mut self) -> &mut Journal<'a> {
        &mut self.journal
    }

    pub fn host(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    /// Run a single action outside any step bracket.
    pub fn run_action(&mut self, action: &Action) -> Result<ActionOutcome> {
        let mut ctx = ActionContext::new(&mut *self.host, self.journal.reborrow(), self.settings);
        action.run(&mut ctx)
    }

    /// Execute an `Actions` step under its own label.
    ///
    /// Selection steps are driven by the session, one
    /// [`execute_actions`](Self::execute_actions) call per choice.
    pub fn execute(&mut self, step: &Step) -> Result<StepReport> {
        match step.body() {
            StepBody::Actions(actions) => self.execute_actions(step.label(), actions),
            StepBody::Selection(_) => Err(SettleError::Other(anyhow::anyhow!(
                "step '{}' is a selection loop and has no fixed actions",
                step.name()
            ))),
        }
    }

    /// Run `actions` in order inside a bracket labelled `label`.
    ///
    /// After a fatal failure the remaining actions are not run; the bracket
    /// is closed and [`SettleError::StepAborted`] is returned.
    pub fn execute_actions(&mut self, label: &str, actions: &[Action]) -> Result<StepReport> {
        let start = Instant::now();
        self.journal.info(format!("Starting step: {}", label))?;

        let mut outcomes = Vec::with_capacity(actions.len());
        let mut aborted = None;
        let mut interrupted = None;

        for action in actions {
            let outcome = match self.run_action(action) {
                Ok(outcome) => outcome,
                Err(e) => {
                    interrupted = Some(e);
                    break;
                }
            };

            if let ActionOutcome::Failed(message) = &outcome {
                let line = format!("{} failed: {}", action.description(), message);
                match action.fallibility() {
                    Fallibility::BestEffort => self.journal.warn(line)?,
                    Fallibility::Fatal => {
                        self.journal.error(line)?;
                        aborted = Some((action.description().to_string(), message.clone()));
                    }
                }
            }

            outcomes.push((action.description().to_string(), outcome));
            if aborted.is_some() {
                break;
            }
        }

        let failed = aborted.is_some() || interrupted.is_some();
        let report = StepReport::new(label, outcomes, start.elapsed(), failed);
        self.journal
            .info(format!("Finished step: {} ({})", label, report.status))?;
        tracing::debug!("{}", report.summary_line());

        if let Some(e) = interrupted {
            return Err(e);
        }
        if let Some((action, message)) = aborted {
            return Err(SettleError::StepAborted {
                step: label.to_string(),
                action,
                message,
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockHost, Privilege};
    use crate::journal::LogSink;
    use crate::session::SessionId;
    use crate::steps::Guard;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn messages(sink: &LogSink) -> Vec<String> {
        sink.entries().iter().map(|e| e.message.clone()).collect()
    }

    fn run(
        host: &mut MockHost,
        label: &str,
        actions: &[Action],
    ) -> (Result<StepReport>, Vec<String>, MockUI) {
        let temp = TempDir::new().unwrap();
        let mut sink = LogSink::open(temp.path(), "test", &SessionId::now()).unwrap();
        let mut ui = MockUI::new();
        let settings = Settings::default();
        let result = {
            let journal = Journal::new(&mut sink, &mut ui);
            let mut executor = StepExecutor::new(host, journal, &settings);
            executor.execute_actions(label, actions)
        };
        (result, messages(&sink), ui)
    }

    #[test]
    fn brackets_successful_step() {
        let mut host = MockHost::new();
        let actions = vec![Action::best_effort("Upgrade", |ctx| {
            ctx.run("dnf upgrade -y", Privilege::Root).map(|_| ())
        })];

        let (result, log, _) = run(&mut host, "Upgrade system packages", &actions);
        let report = result.unwrap();

        assert_eq!(report.status, StepStatus::Completed);
        assert_eq!(log.first().unwrap(), "Starting step: Upgrade system packages");
        assert_eq!(
            log.last().unwrap(),
            "Finished step: Upgrade system packages (completed)"
        );
    }

    #[test]
    fn best_effort_failure_continues() {
        let mut host = MockHost::new();
        host.fail_command("first", 1);
        let actions = vec![
            Action::best_effort("First", |ctx| ctx.run("first", Privilege::User).map(|_| ())),
            Action::best_effort("Second", |ctx| ctx.run("second", Privilege::User).map(|_| ())),
        ];

        let (result, log, ui) = run(&mut host, "Apps", &actions);
        let report = result.unwrap();

        assert_eq!(report.status, StepStatus::CompletedWithWarnings);
        assert_eq!(report.outcomes.len(), 2);
        assert!(host.ran("second"));
        assert!(ui.has_warning("First failed"));
        assert_eq!(log.last().unwrap(), "Finished step: Apps (completed with warnings)");
    }

    #[test]
    fn fatal_failure_stops_and_closes_bracket() {
        let mut host = MockHost::new();
        host.fail_command("rpmfusion", 1);
        let actions = vec![
            Action::fatal("Enable RPM Fusion", |ctx| {
                ctx.run("dnf install -y rpmfusion-free-release", Privilege::Root)
                    .map(|_| ())
            }),
            Action::best_effort("Refresh metadata", |ctx| {
                ctx.run("dnf makecache", Privilege::Root).map(|_| ())
            }),
        ];

        let (result, log, ui) = run(&mut host, "Repositories", &actions);

        match result.unwrap_err() {
            SettleError::StepAborted { step, action, .. } => {
                assert_eq!(step, "Repositories");
                assert_eq!(action, "Enable RPM Fusion");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!host.ran("makecache"));
        assert!(ui.has_error("Enable RPM Fusion failed"));
        assert_eq!(log.last().unwrap(), "Finished step: Repositories (failed)");
        let starts = log.iter().filter(|m| m.starts_with("Starting step")).count();
        let ends = log.iter().filter(|m| m.starts_with("Finished step")).count();
        assert_eq!((starts, ends), (1, 1));
    }

    #[test]
    fn all_guarded_actions_skipped() {
        let mut host = MockHost::new();
        host.mark_installed("git");
        let actions = vec![Action::best_effort("Install git", |ctx| {
            ctx.install_packages(&["git"])
        })
        .guarded_by(Guard::package_installed("git"))];

        let (result, log, _) = run(&mut host, "Apps", &actions);
        assert_eq!(result.unwrap().status, StepStatus::Skipped);
        assert!(host.mutations().is_empty());
        assert!(log.contains(&"Finished step: Apps (skipped)".to_string()));
    }

    #[test]
    fn closed_input_still_closes_bracket() {
        let mut host = MockHost::new();
        let actions = vec![Action::best_effort("Ask", |_| Err(SettleError::InputClosed))];

        let (result, log, _) = run(&mut host, "Hostname", &actions);
        assert!(matches!(result.unwrap_err(), SettleError::InputClosed));
        assert_eq!(log.last().unwrap(), "Finished step: Hostname (failed)");
    }

    #[test]
    fn format_duration_ranges() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(4200)), "4.2s");
        assert_eq!(format_duration(Duration::from_secs(192)), "3m 12s");
    }

    #[test]
    fn summary_line_for_failed_step() {
        let report = StepReport::new(
            "Repositories",
            vec![("Enable".into(), ActionOutcome::Failed("exit 1".into()))],
            Duration::ZERO,
            true,
        );
        assert_eq!(report.summary_line(), "✗ Repositories - exit 1");
    }
}
