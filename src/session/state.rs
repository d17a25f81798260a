//! Session lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every step ran (or was declined), or the user declined to start.
    Success,
    /// A fatal failure stopped the session.
    Aborted,
}

impl Termination {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::Success => 0,
            Termination::Aborted => 1,
        }
    }
}

/// Where a session is in its lifecycle.
///
/// `Initializing → ConfirmingPrerequisites → Executing → Summarizing →
/// Terminated`. Any state may jump to `Terminated(Aborted)`; declining the
/// prerequisites jumps to `Terminated(Success)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    ConfirmingPrerequisites,
    Executing,
    Summarizing,
    Terminated(Termination),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated(_))
    }

    /// Whether `next` may follow this state.
    pub fn can_advance_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Terminated(_), _) => false,
            (_, Terminated(Termination::Aborted)) => true,
            (Initializing, ConfirmingPrerequisites) => true,
            (ConfirmingPrerequisites, Executing) => true,
            (ConfirmingPrerequisites, Terminated(Termination::Success)) => true,
            (Executing, Summarizing) => true,
            (Summarizing, Terminated(Termination::Success)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Initializing => write!(f, "initializing"),
            SessionState::ConfirmingPrerequisites => write!(f, "confirming prerequisites"),
            SessionState::Executing => write!(f, "executing"),
            SessionState::Summarizing => write!(f, "summarizing"),
            SessionState::Terminated(Termination::Success) => write!(f, "terminated (success)"),
            SessionState::Terminated(Termination::Aborted) => write!(f, "terminated (aborted)"),
        }
    }
}

/// Current state plus every state visited so far.
#[derive(Debug, Clone)]
pub struct StateMachine {
    history: Vec<SessionState>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            history: vec![SessionState::Initializing],
        }
    }

    pub fn current(&self) -> SessionState {
        // history is never empty
        self.history
            .last()
            .copied()
            .unwrap_or(SessionState::Initializing)
    }

    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are ignored and reported.
    pub fn advance(&mut self, next: SessionState) -> bool {
        let current = self.current();
        if !current.can_advance_to(next) {
            tracing::warn!(from = %current, to = %next, "ignoring illegal session transition");
            return false;
        }
        tracing::debug!(from = %current, to = %next, "session transition");
        self.history.push(next);
        true
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
