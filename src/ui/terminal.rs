//! Interactive terminal UI.

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use std::io::{IsTerminal, Write};

use crate::error::{Result, SettleError};

use super::{
    should_use_colors, NonInteractiveUI, ProgressSpinner, SpinnerHandle, Theme, UserInterface,
};

/// Convert dialoguer errors to SettleError.
fn map_dialoguer_err(e: dialoguer::Error) -> SettleError {
    SettleError::Io(e.into())
}

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: Theme,
    prompt_theme: ColorfulTheme,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new() -> Self {
        let theme = if should_use_colors() {
            Theme::new()
        } else {
            Theme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            prompt_theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        Term::stderr()
            .write_line(&self.theme.format_error(msg))
            .ok();
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.prompt_theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(ProgressSpinner::new(message, self.theme.clone()))
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
    }
}

/// Create the appropriate UI for the current process.
///
/// Uses the terminal UI when both stdin and stdout are terminals and falls
/// back to line-oriented stdin reading otherwise.
pub fn create_ui() -> Box<dyn UserInterface> {
    if Term::stdout().is_term() && std::io::stdin().is_terminal() {
        Box::new(TerminalUI::new())
    } else {
        Box::new(NonInteractiveUI::new(std::io::stdin().lock()))
    }
}
