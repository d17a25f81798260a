//! Session audit log.
//!
//! - [`LogSink`] - the durable, append-only log file
//! - [`LogEntry`] / [`Severity`] - one timestamped line
//! - [`Journal`] - a sink paired with the terminal, so every entry written
//!   to disk is also shown to the user
//!
//! The journal is the user-facing record of what was changed. Internal
//! diagnostics go through `tracing` instead.

mod entry;
mod sink;

pub use entry::{LogEntry, Severity, TIMESTAMP_FORMAT};
pub use sink::{log_file_path, LogSink};

use crate::error::Result;
use crate::ui::UserInterface;

/// A log sink mirrored to the terminal.
pub struct Journal<'a> {
    sink: &'a mut LogSink,
    ui: &'a mut dyn UserInterface,
}

impl<'a> Journal<'a> {
    pub fn new(sink: &'a mut LogSink, ui: &'a mut dyn UserInterface) -> Self {
        Self { sink, ui }
    }

    /// Borrow this journal for a shorter scope.
    pub fn reborrow(&mut self) -> Journal<'_> {
        Journal {
            sink: &mut *self.sink,
            ui: &mut *self.ui,
        }
    }

    /// Persist an entry, then show it.
    ///
    /// `Prompt` entries are persisted only: the question and answer are
    /// already on screen.
    pub fn record(&mut self, entry: LogEntry) -> Result<()> {
        let severity = entry.severity;
        let message = entry.message.clone();
        self.sink.append(entry)?;

        match severity {
            Severity::Info => self.ui.message(&message),
            Severity::Warn => self.ui.warning(&message),
            Severity::Error => self.ui.error(&message),
            Severity::Prompt => {}
        }
        Ok(())
    }

    pub fn info(&mut self, message: impl Into<String>) -> Result<()> {
        self.record(LogEntry::info(message))
    }

    pub fn warn(&mut self, message: impl Into<String>) -> Result<()> {
        self.record(LogEntry::warn(message))
    }

    pub fn error(&mut self, message: impl Into<String>) -> Result<()> {
        self.record(LogEntry::error(message))
    }

    pub fn prompt(&mut self, message: impl Into<String>) -> Result<()> {
        self.record(LogEntry::prompt(message))
    }

    /// Log at `Info` but render as a success line.
    pub fn success(&mut self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        self.sink.append(LogEntry::info(message.clone()))?;
        self.ui.success(&message);
        Ok(())
    }

    /// The terminal side, for prompts and spinners.
    pub fn ui(&mut self) -> &mut dyn UserInterface {
        &mut *self.ui
    }

    /// The file side.
    pub fn sink(&self) -> &LogSink {
        self.sink
    }
}
