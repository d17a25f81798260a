//! Provisioning sessions.
//!
//! - [`SessionId`] - start-time identifier shared by the log and record files
//! - [`ProvisioningSession`] - drives the plan through its [`SessionState`]s
//! - [`SessionSummary`] - what was accepted, declined and warned about

mod id;
mod provisioning;
mod state;
mod summary;

pub use id::SessionId;
pub use provisioning::{ProvisioningSession, SessionReport, PREREQUISITES_QUESTION};
pub use state::{SessionState, StateMachine, Termination};
pub use summary::{summary_file_path, SessionSummary, StepRecord};
