//! The provisioning session: one run of the plan, start to finish.

use chrono::Local;
use std::path::PathBuf;

use super::state::{SessionState, StateMachine, Termination};
use super::summary::{summary_file_path, SessionSummary, StepRecord};
use super::SessionId;
use crate::config::Settings;
use crate::error::Result;
use crate::host::Host;
use crate::journal::{Journal, LogSink};
use crate::prompts::{choose, confirm};
use crate::steps::{Step, StepBody, StepExecutor};
use crate::ui::UserInterface;

/// Question asked before any step runs.
pub const PREREQUISITES_QUESTION: &str = "Continue with provisioning?";

/// What a finished session reports back to the caller.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub termination: Termination,

    /// The log file, if it could be opened.
    pub log_file: Option<PathBuf>,

    /// Present when the session reached `Summarizing`.
    pub summary: Option<SessionSummary>,

    /// Why the session aborted.
    pub error: Option<String>,
}

impl SessionReport {
    pub fn exit_code(&self) -> i32 {
        self.termination.exit_code()
    }

    pub fn is_success(&self) -> bool {
        self.termination == Termination::Success
    }
}

/// Owns the plan and drives it through the session states.
///
/// Steps run exactly once, in declaration order. The only suspension points
/// are prompts; there is no rollback.
pub struct ProvisioningSession {
    id: SessionId,
    settings: Settings,
    steps: Vec<Step>,
    machine: StateMachine,
}

impl ProvisioningSession {
    /// Create a session starting now.
    pub fn new(settings: Settings, steps: Vec<Step>) -> Self {
        Self::with_id(SessionId::now(), settings, steps)
    }

    pub fn with_id(id: SessionId, settings: Settings, steps: Vec<Step>) -> Self {
        Self {
            id,
            settings,
            steps,
            machine: StateMachine::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.machine.current()
    }

    /// Every state visited, starting with `Initializing`.
    pub fn transitions(&self) -> &[SessionState] {
        self.machine.history()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the session to completion.
    ///
    /// Never returns an error: every failure ends in `Terminated(Aborted)`
    /// with the reason in the report and, when possible, in the log.
    pub fn run(&mut self, ui: &mut dyn UserInterface, host: &mut dyn Host) -> SessionReport {
        let log_dir = self.settings.log_dir();
        let mut sink = match LogSink::open(&log_dir, &self.settings.log_prefix, &self.id) {
            Ok(sink) => sink,
            Err(e) => {
                ui.error(&e.to_string());
                return self.finish(Termination::Aborted, None, None, Some(e.to_string()));
            }
        };
        let log_file = sink.path().to_path_buf();

        let (termination, summary, error) = match self.drive(&mut sink, &mut *ui, host) {
            Ok(summary) => (Termination::Success, summary, None),
            Err(e) => {
                let message = format!("Session aborted: {}", e);
                if let Err(log_err) = Journal::new(&mut sink, &mut *ui).error(message.clone()) {
                    tracing::warn!(error = %log_err, "could not log abort");
                    ui.error(&message);
                }
                (Termination::Aborted, None, Some(message))
            }
        };

        if let Err(e) = sink.close() {
            tracing::warn!(error = %e, "could not close session log");
        }
        self.finish(termination, Some(log_file), summary, error)
    }

    fn finish(
        &mut self,
        termination: Termination,
        log_file: Option<PathBuf>,
        summary: Option<SessionSummary>,
        error: Option<String>,
    ) -> SessionReport {
        self.machine.advance(SessionState::Terminated(termination));
        SessionReport {
            session_id: self.id,
            termination,
            log_file,
            summary,
            error,
        }
    }

    /// Initializing through Summarizing. `Ok(None)` means the user declined
    /// to start.
    fn drive(
        &mut self,
        sink: &mut LogSink,
        ui: &mut dyn UserInterface,
        host: &mut dyn Host,
    ) -> Result<Option<SessionSummary>> {
        let log_file = sink.path().to_path_buf();
        let mut executor = StepExecutor::new(host, Journal::new(sink, ui), &self.settings);
        let dry_run = executor.host().dry_run();

        // Initializing
        executor
            .journal()
            .ui()
            .show_header("Fedora workstation provisioning");
        let journal = executor.journal();
        journal.info(format!("Session {} started", self.id))?;
        journal.info(format!("Logging to {}", log_file.display()))?;
        if dry_run {
            journal.info("Dry run: commands are logged, nothing is changed")?;
        }
        check_connectivity(&mut executor, &self.settings)?;

        // ConfirmingPrerequisites
        self.machine.advance(SessionState::ConfirmingPrerequisites);
        let journal = executor.journal();
        journal.info("Planned steps:")?;
        for (i, step) in self.steps.iter().enumerate() {
            let marker = if step.is_required() { "" } else { " (optional)" };
            journal.info(format!("  {}. {}{}", i + 1, step.label(), marker))?;
        }
        if executor.host().is_elevated() {
            executor.journal().warn(
                "Running as root: per-user settings such as the login shell and fonts apply to root",
            )?;
        }
        if !confirm(executor.journal(), PREREQUISITES_QUESTION)? {
            executor
                .journal()
                .info("Provisioning cancelled, nothing was changed")?;
            return Ok(None);
        }

        // Executing
        self.machine.advance(SessionState::Executing);
        let mut records = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            match step.body() {
                StepBody::Actions(actions) => {
                    if let Some(question) = step.gate() {
                        if !confirm(executor.journal(), question)? {
                            executor
                                .journal()
                                .info(format!("Declined step: {}", step.label()))?;
                            records.push(StepRecord::declined(step));
                            continue;
                        }
                    }
                    let report = executor.execute_actions(step.label(), actions)?;
                    records.push(StepRecord::from_report(step, &report));
                }
                StepBody::Selection(selection) => {
                    let labels = selection.labels();
                    let mut picks = Vec::new();
                    loop {
                        let index =
                            choose(executor.journal(), selection.prompt(), labels.as_slice())?;
                        let Some(option) = selection.get(index) else {
                            break;
                        };
                        let label = format!("{}: {}", step.label(), option.label);
                        let report = executor.execute_actions(&label, &option.actions)?;
                        picks.push((option.label.clone(), report));
                    }
                    let record = StepRecord::from_selections(step, &picks);
                    if picks.is_empty() {
                        executor
                            .journal()
                            .info(format!("Declined step: {}", step.label()))?;
                    }
                    records.push(record);
                }
            }
        }

        // Summarizing
        self.machine.advance(SessionState::Summarizing);
        let summary = SessionSummary {
            session_id: self.id,
            started_at: self.id.started_at(),
            finished_at: Local::now().naive_local(),
            dry_run,
            termination: Termination::Success,
            log_file: log_file.clone(),
            steps: records,
        };
        let journal = executor.journal();
        summary.log(journal)?;

        let record_path = summary_file_path(
            &self.settings.log_dir(),
            &self.settings.log_prefix,
            &self.id,
        );
        match summary.write(&record_path) {
            Ok(()) => journal.info(format!(
                "Session record written to {}",
                record_path.display()
            ))?,
            Err(e) => journal.warn(format!(
                "Could not write session record {}: {}",
                record_path.display(),
                e
            ))?,
        }
        journal.success(format!(
            "Provisioning finished. Full log: {}",
            log_file.display()
        ))?;

        Ok(Some(summary))
    }
}

/// The reachability check run before anything else. Always fatal.
fn check_connectivity(executor: &mut StepExecutor<'_>, settings: &Settings) -> Result<()> {
    let url = &settings.connectivity.url;
    let mut spinner = executor
        .journal()
        .ui()
        .start_spinner(&format!("Checking network connectivity ({})", url));

    match executor
        .host()
        .check_connectivity(url, settings.connectivity.timeout())
    {
        Ok(()) => {
            spinner.finish_success("Network is reachable");
            executor
                .journal()
                .info(format!("Network connectivity confirmed ({})", url))
        }
        Err(e) => {
            spinner.finish_error("Network is unreachable");
            Err(e)
        }
    }
}
