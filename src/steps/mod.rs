//! Steps, actions and their execution.
//!
//! - [`Step`] - a named, labelled unit of the provisioning plan
//! - [`Action`] - one mutation with a declared [`Fallibility`]
//! - [`Guard`] - skips an action when its work is already done
//! - [`StepExecutor`] - runs actions inside a logged bracket
//!
//! # Example
//!
//! ```
//! use settle::config::Settings;
//! use settle::host::{MockHost, Privilege};
//! use settle::journal::{Journal, LogSink};
//! use settle::session::SessionId;
//! use settle::steps::{Action, Guard, Step, StepExecutor, StepStatus};
//! use settle::ui::MockUI;
//!
//! let step = Step::required(
//!     "shell-tools",
//!     "Install shell tools",
//!     vec![Action::best_effort("Install zsh", |ctx| ctx.install_packages(&["zsh"]))
//!         .guarded_by(Guard::package_installed("zsh"))],
//! );
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut sink = LogSink::open(dir.path(), "doc", &SessionId::now()).unwrap();
//! let mut ui = MockUI::new();
//! let mut host = MockHost::new();
//! host.mark_installed("zsh");
//! let settings = Settings::default();
//!
//! let mut executor = StepExecutor::new(&mut host, Journal::new(&mut sink, &mut ui), &settings);
//! let report = executor.execute(&step).unwrap();
//! assert_eq!(report.status, StepStatus::Skipped);
//! ```

pub mod action;
pub mod executor;
pub mod guard;

pub use action::{Action, ActionContext, ActionOutcome, Fallibility};
pub use executor::{format_duration, StepExecutor, StepReport, StepStatus};
pub use guard::{CheckResult, Guard};

/// What a step does when it runs.
#[derive(Debug)]
pub enum StepBody {
    /// A fixed list of actions, run once.
    Actions(Vec<Action>),
    /// A menu presented until the terminating option is picked.
    Selection(SelectionLoop),
}

/// One entry of the provisioning plan.
#[derive(Debug)]
pub struct Step {
    name: String,
    label: String,
    required: bool,
    gate: Option<String>,
    body: StepBody,
}

impl Step {
    /// A step that always runs.
    pub fn required(
        name: impl Into<String>,
        label: impl Into<String>,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: true,
            gate: None,
            body: StepBody::Actions(actions),
        }
    }

    /// A step that runs only if the user answers yes to `question`.
    pub fn optional(
        name: impl Into<String>,
        label: impl Into<String>,
        question: impl Into<String>,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            gate: Some(question.into()),
            body: StepBody::Actions(actions),
        }
    }

    /// A selection loop. The terminating option makes it optional in effect.
    pub fn selection(
        name: impl Into<String>,
        label: impl Into<String>,
        selection: SelectionLoop,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            gate: None,
            body: StepBody::Selection(selection),
        }
    }

    /// Stable identifier, used in the session record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label, used in the log brackets.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Confirmation question for optional action steps.
    pub fn gate(&self) -> Option<&str> {
        self.gate.as_deref()
    }

    pub fn body(&self) -> &StepBody {
        &self.body
    }
}

/// One choosable option of a selection loop.
#[derive(Debug)]
pub struct SelectionOption {
    pub label: String,
    pub actions: Vec<Action>,
}

/// A menu whose options each own a list of actions.
///
/// Presented repeatedly; each pick runs that option's actions. Picking the
/// terminator ends the loop.
#[derive(Debug)]
pub struct SelectionLoop {
    prompt: String,
    options: Vec<SelectionOption>,
    terminator: String,
}

impl SelectionLoop {
    pub fn new(prompt: impl Into<String>, terminator: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: Vec::new(),
            terminator: terminator.into(),
        }
    }

    /// Add an option.
    pub fn option(mut self, label: impl Into<String>, actions: Vec<Action>) -> Self {
        self.options.push(SelectionOption {
            label: label.into(),
            actions,
        });
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[SelectionOption] {
        &self.options
    }

    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    /// Menu labels: the options, then the terminator last.
    pub fn labels(&self) -> Vec<&str> {
        self.options
            .iter()
            .map(|o| o.label.as_str())
            .chain(std::iter::once(self.terminator.as_str()))
            .collect()
    }

    /// The option at a menu index, or `None` for the terminator.
    pub fn get(&self, index: usize) -> Option<&SelectionOption> {
        self.options.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_step_has_gate() {
        let step = Step::optional("upgrade", "Upgrade", "Upgrade all packages?", vec![]);
        assert!(!step.is_required());
        assert_eq!(step.gate(), Some("Upgrade all packages?"));
    }

    #[test]
    fn required_step_has_no_gate() {
        let step = Step::required("repos", "Repositories", vec![]);
        assert!(step.is_required());
        assert_eq!(step.gate(), None);
    }

    #[test]
    fn selection_labels_end_with_terminator() {
        let selection = SelectionLoop::new("Pick GPU", "Skip")
            .option("NVIDIA", vec![])
            .option("AMD", vec![])
            .option("Intel", vec![]);

        assert_eq!(selection.labels(), vec!["NVIDIA", "AMD", "Intel", "Skip"]);
        assert_eq!(selection.get(1).map(|o| o.label.as_str()), Some("AMD"));
        assert!(selection.get(3).is_none());
    }
}
