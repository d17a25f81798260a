//! Session log entries.

use chrono::{Local, NaiveDateTime};
use std::fmt;

/// Timestamp format used in the log file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
    /// A user's accepted answer to a prompt.
    Prompt,
}

impl Severity {
    /// Prefix written in front of the message in the log file.
    fn tag(&self) -> &'static str {
        match self {
            Severity::Info => "",
            Severity::Warn => "WARNING: ",
            Severity::Error => "ERROR: ",
            Severity::Prompt => "PROMPT: ",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Prompt => "prompt",
        };
        write!(f, "{}", s)
    }
}

/// One line of the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time.
    pub fn now(severity: Severity, message: impl Into<String>) -> Self {
        Self::at(Local::now().naive_local(), severity, message)
    }

    /// Create an entry with an explicit timestamp.
    pub fn at(timestamp: NaiveDateTime, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::now(Severity::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::now(Severity::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::now(Severity::Error, message)
    }

    pub fn prompt(message: impl Into<String>) -> Self {
        Self::now(Severity::Prompt, message)
    }

    /// Render as a log file line (without trailing newline).
    ///
    /// Format: `[YYYY-MM-DD HH:MM:SS] <message>`. Line breaks inside the
    /// message are written as `\n` and `\r` so one entry is one line.
    pub fn render(&self) -> String {
        format!(
            "[{}] {}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.severity.tag(),
            self.message.replace('\r', "\\r").replace('\n', "\\n")
        )
    }
}
