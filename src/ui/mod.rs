//! Terminal user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for piped, line-oriented input
//! - [`MockUI`] for tests
//!
//! The prompt layer in [`crate::prompts`] only needs [`UserInterface::read_line`];
//! validation and retry live there, not in the UI implementations.
//!
//! # Example
//!
//! ```
//! use settle::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::with_input(["yes"]);
//! ui.show_header("Provisioning");
//! let answer = ui.read_line("Continue? [y/n]").unwrap();
//! assert_eq!(answer, "yes");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a single-line prompt and block until one line of input arrives.
    ///
    /// The returned line has its trailing newline removed. Returns
    /// [`SettleError::InputClosed`](crate::error::SettleError::InputClosed)
    /// when input ends.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Start a spinner for a long-running operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}
