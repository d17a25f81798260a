//! Settle - interactive post-install provisioning for Fedora workstations.
//!
//! Settle walks a human through a long, partly idempotent sequence of
//! system changes: repositories, drivers, codecs, applications, shell and
//! fonts. Optional work sits behind confirmations, every outcome is logged
//! durably, and a failing best-effort action never stops the run.
//!
//! # Modules
//!
//! - [`catalog`] - The concrete workstation plan
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`host`] - The machine being provisioned
//! - [`journal`] - Durable session log mirrored to the terminal
//! - [`prompts`] - Confirmation, choice and text prompts
//! - [`session`] - Session lifecycle and summary
//! - [`shell`] - Shell command execution
//! - [`steps`] - Steps, actions, guards and the step executor
//! - [`ui`] - Terminal output, line input and spinners
//!
//! # Example
//!
//! ```
//! use settle::config::Settings;
//! use settle::host::MockHost;
//! use settle::session::ProvisioningSession;
//! use settle::steps::{Action, Step};
//! use settle::ui::MockUI;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let settings = Settings {
//!     log_dir: Some(dir.path().to_path_buf()),
//!     ..Default::default()
//! };
//! let steps = vec![Step::optional(
//!     "hello",
//!     "Say hello",
//!     "Say hello?",
//!     vec![Action::best_effort("Greet", |ctx| ctx.info("hello"))],
//! )];
//!
//! let mut session = ProvisioningSession::new(settings, steps);
//! let mut ui = MockUI::with_input(["y", "y"]);
//! let report = session.run(&mut ui, &mut MockHost::new());
//! assert_eq!(report.exit_code(), 0);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod journal;
pub mod prompts;
pub mod session;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{Result, SettleError};
