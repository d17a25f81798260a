//! Shell command execution.

use crate::error::{Result, SettleError};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Execute a command line with `/bin/sh -c`.
///
/// Stdin is never inherited: the terminal belongs to the prompt layer, so a
/// command asking a question reads EOF instead of stealing an answer.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c");
    cmd.arg(command);
    cmd.stdin(Stdio::null());

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!(command, "spawning");
    let output = cmd.output().map_err(|e| {
        tracing::debug!(command, error = %e, "spawn failed");
        SettleError::CommandFailed {
            command: command.to_string(),
            code: None,
        }
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    tracing::debug!(command, code = ?output.status.code(), ?duration, "finished");

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Quote an argument for `/bin/sh`.
///
/// Plain words pass through untouched so logged command lines stay readable.
pub fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+@%,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// Execute a command and return success/failure.
pub fn execute_check(command: &str) -> bool {
    execute_quiet(command)
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Execute a command and collect output without echoing it.
pub fn execute_quiet(command: &str) -> Result<CommandResult> {
    let options = CommandOptions {
        capture_stdout: true,
        capture_stderr: true,
    };
    execute(command, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let result = execute_quiet("echo hello").unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute_quiet("exit 3").unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn uncaptured_output_is_empty() {
        let result = execute("echo hidden", &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn stdin_is_closed() {
        let result = execute_quiet("read line || echo eof").unwrap();
        assert!(result.stdout.contains("eof"));
    }

    #[test]
    fn quote_leaves_plain_words() {
        assert_eq!(quote("neovim"), "neovim");
        assert_eq!(quote("/usr/bin/zsh"), "/usr/bin/zsh");
        assert_eq!(quote("com.github.tchx84.Flatseal"), "com.github.tchx84.Flatseal");
    }

    #[test]
    fn quote_wraps_everything_else() {
        assert_eq!(quote(""), "''");
        assert_eq!(quote("two words"), "'two words'");
        assert_eq!(quote("it's"), "'it'\\''s'");

        let result = execute_quiet(&format!("printf %s {}", quote("it's $HOME"))).unwrap();
        assert_eq!(result.stdout, "it's $HOME");
    }

    #[test]
    fn execute_check_returns_bool() {
        assert!(execute_check("exit 0"));
        assert!(!execute_check("exit 1"));
    }

    #[test]
    fn stderr_is_captured() {
        let result = execute_quiet("echo oops >&2").unwrap();
        assert!(result.stderr.contains("oops"));
        assert!(result.stdout.is_empty());
    }
}
