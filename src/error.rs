//! Error types for settle operations.
//!
//! This module defines [`SettleError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Domain variants mirror the provisioning failure classes: connectivity,
//!   repository setup, package actions and input validation
//! - Whether a failure aborts the session is decided by the Action that
//!   produced it, never by the variant
//! - Use `anyhow::Error` (via `SettleError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for settle operations.
#[derive(Debug, Error)]
pub enum SettleError {
    /// The network reachability check failed.
    #[error("No network connectivity ({url}): {message}")]
    Connectivity { url: String, message: String },

    /// A package repository could not be registered.
    #[error("Repository setup failed for '{repository}': {message}")]
    RepositorySetup { repository: String, message: String },

    /// A package install/remove/upgrade failed.
    #[error("Package action '{action}' failed: {message}")]
    PackageAction { action: String, message: String },

    /// User input did not match what the prompt accepts.
    ///
    /// Never propagated out of the prompt layer; it is rendered as a retry
    /// message and the prompt is shown again.
    #[error("Invalid input '{input}': {message}")]
    InvalidInput { input: String, message: String },

    /// Standard input was closed while a prompt was waiting.
    #[error("Input closed while waiting for an answer")]
    InputClosed,

    /// A choice was requested with no options to choose from.
    #[error("Nothing to choose from for '{prompt}'")]
    EmptyChoice { prompt: String },

    /// A fatal Action failed and the session must stop.
    #[error("Step '{step}' aborted: {action} failed: {message}")]
    StepAborted {
        step: String,
        action: String,
        message: String,
    },

    /// The session log could not be created or written.
    #[error("Cannot write session log at {path}: {source}")]
    LogSinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A download failed or did not match its checksum.
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SettleError {
    /// Whether this error ends the session regardless of the failing
    /// Action's fallibility: the user can no longer answer, or the audit
    /// log can no longer be written.
    pub fn interrupts_session(&self) -> bool {
        matches!(
            self,
            SettleError::InputClosed | SettleError::LogSinkUnavailable { .. }
        )
    }
}

/// Result type alias for settle operations.
pub type Result<T> = std::result::Result<T, SettleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_closed_input_and_lost_log_interrupt() {
        assert!(SettleError::InputClosed.interrupts_session());
        assert!(SettleError::LogSinkUnavailable {
            path: PathBuf::from("/var/log/settle.log"),
            source: std::io::Error::other("disk full"),
        }
        .interrupts_session());
        assert!(!SettleError::PackageAction {
            action: "install vlc".into(),
            message: "exit code 1".into(),
        }
        .interrupts_session());
    }

    #[test]
    fn connectivity_displays_url_and_message() {
        let err = SettleError::Connectivity {
            url: "https://fedoraproject.org".into(),
            message: "timed out".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://fedoraproject.org"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn repository_setup_displays_repository() {
        let err = SettleError::RepositorySetup {
            repository: "rpmfusion-free".into(),
            message: "exit code 1".into(),
        };
        assert!(err.to_string().contains("rpmfusion-free"));
    }

    #[test]
    fn step_aborted_names_step_and_action() {
        let err = SettleError::StepAborted {
            step: "Enable RPM Fusion repositories".into(),
            action: "Install rpmfusion-free-release".into(),
            message: "exit code 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Enable RPM Fusion repositories"));
        assert!(msg.contains("Install rpmfusion-free-release"));
    }

    #[test]
    fn log_sink_unavailable_displays_path() {
        let err = SettleError::LogSinkUnavailable {
            path: PathBuf::from("/nope/logs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/logs"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SettleError::CommandFailed {
            command: "dnf install -y zsh".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("dnf install -y zsh"));
        assert!(msg.contains('1'));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SettleError = io_err.into();
        assert!(matches!(err, SettleError::Io(_)));
    }
}
