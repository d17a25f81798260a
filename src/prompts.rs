//! Confirmation, choice and text prompts.
//!
//! Each prompt blocks until it gets an answer it accepts. Rejected input
//! writes a single retry warning to the journal and asks again; nothing else
//! happens, so a typo can never advance the session. There is no timeout:
//! a human is expected to be at the keyboard. The only way out besides a
//! valid answer is closed input ([`SettleError::InputClosed`]).
//!
//! # Example
//!
//! ```
//! use settle::journal::{Journal, LogSink};
//! use settle::prompts::confirm;
//! use settle::session::SessionId;
//! use settle::ui::MockUI;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut sink = LogSink::open(dir.path(), "doc", &SessionId::now()).unwrap();
//! let mut ui = MockUI::with_input(["maybe", "Y"]);
//! let mut journal = Journal::new(&mut sink, &mut ui);
//!
//! assert!(confirm(&mut journal, "Install X?").unwrap());
//! ```

use crate::error::{Result, SettleError};
use crate::journal::Journal;

/// Interpret a yes/no answer. Case-insensitive, surrounding whitespace ignored.
pub fn parse_yes_no(input: &str) -> Result<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err(SettleError::InvalidInput {
            input: input.to_string(),
            message: "please answer y or n".to_string(),
        }),
    }
}

/// Interpret a 1-based menu selection, returning the zero-based index.
pub fn parse_selection(input: &str, option_count: usize) -> Result<usize> {
    let invalid = || SettleError::InvalidInput {
        input: input.to_string(),
        message: format!("enter a number between 1 and {}", option_count),
    };

    let number: usize = input.trim().parse().map_err(|_| invalid())?;
    if (1..=option_count).contains(&number) {
        Ok(number - 1)
    } else {
        Err(invalid())
    }
}

/// Ask a yes/no question until the answer is recognised.
pub fn confirm(journal: &mut Journal<'_>, question: &str) -> Result<bool> {
    let line_prompt = format!("{} [y/n]", question);
    loop {
        let line = journal.ui().read_line(&line_prompt)?;
        match parse_yes_no(&line) {
            Ok(answer) => {
                let word = if answer { "yes" } else { "no" };
                journal.prompt(format!("{} -> {}", question, word))?;
                return Ok(answer);
            }
            Err(rejected) => journal.warn(rejected.to_string())?,
        }
    }
}

/// Show a numbered menu and return the zero-based index of the chosen option.
///
/// The menu is rendered again after every rejected answer.
pub fn choose<S: AsRef<str>>(
    journal: &mut Journal<'_>,
    prompt: &str,
    options: &[S],
) -> Result<usize> {
    if options.is_empty() {
        return Err(SettleError::EmptyChoice {
            prompt: prompt.to_string(),
        });
    }

    let line_prompt = format!("Enter choice [1-{}]", options.len());
    loop {
        let ui = journal.ui();
        ui.message(prompt);
        for (i, label) in options.iter().enumerate() {
            ui.message(&format!("  {}) {}", i + 1, label.as_ref()));
        }

        let line = ui.read_line(&line_prompt)?;
        match parse_selection(&line, options.len()) {
            Ok(index) => {
                journal.prompt(format!("{} -> {}", prompt, options[index].as_ref()))?;
                return Ok(index);
            }
            Err(rejected) => journal.warn(rejected.to_string())?,
        }
    }
}

/// Ask for a line of text until `validate` accepts it.
///
/// The answer is trimmed before validation. `validate` returns the reason
/// for rejecting an answer.
pub fn input<F>(journal: &mut Journal<'_>, question: &str, validate: F) -> Result<String>
where
    F: Fn(&str) -> std::result::Result<(), String>,
{
    loop {
        let line = journal.ui().read_line(question)?;
        let answer = line.trim();
        match validate(answer) {
            Ok(()) => {
                journal.prompt(format!("{} -> {}", question, answer))?;
                return Ok(answer.to_string());
            }
            Err(message) => {
                let rejected = SettleError::InvalidInput {
                    input: answer.to_string(),
                    message,
                };
                journal.warn(rejected.to_string())?;
            }
        }
    }
}
