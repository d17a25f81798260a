//! Durable, append-only session log file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, SettleError};
use crate::session::SessionId;

use super::LogEntry;

/// Path of the log file for a session: `<dir>/<prefix>-<YYYYMMDD_HHMMSS>.log`.
///
/// Two sessions started within the same second map to the same file. The
/// file is opened in append mode, so both sessions' lines are kept.
pub fn log_file_path(dir: &Path, prefix: &str, session: &SessionId) -> PathBuf {
    dir.join(format!("{}-{}.log", prefix, session))
}

/// Append-only log file for one provisioning session.
///
/// Every [`append`](LogSink::append) is flushed and synced to disk before it
/// returns. Entries are also kept in memory for the session summary.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: File,
    entries: Vec<LogEntry>,
}

impl LogSink {
    /// Create the log directory (if needed) and open the session's log file.
    pub fn open(dir: &Path, prefix: &str, session: &SessionId) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| SettleError::LogSinkUnavailable {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = log_file_path(dir, prefix, session);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SettleError::LogSinkUnavailable {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Opened session log at {}", path.display());

        Ok(Self {
            path,
            file,
            entries: Vec::new(),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries appended during this session, in emission order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Write one entry and sync it to disk.
    pub fn append(&mut self, entry: LogEntry) -> Result<()> {
        let line = format!("{}\n", entry.render());
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync_data())
            .map_err(|source| SettleError::LogSinkUnavailable {
                path: self.path.clone(),
                source,
            })?;

        self.entries.push(entry);
        Ok(())
    }

    /// Flush everything and close the file, returning its path.
    pub fn close(mut self) -> Result<PathBuf> {
        self.file
            .flush()
            .and_then(|_| self.file.sync_all())
            .map_err(|source| SettleError::LogSinkUnavailable {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.path)
    }
}
