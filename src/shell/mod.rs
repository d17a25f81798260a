//! Shell command execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{execute, execute_check, execute_quiet, quote, CommandOptions, CommandResult};
pub use platform::{current_uid, is_elevated, parse_login_shell, parse_passwd, PasswdEntry};
