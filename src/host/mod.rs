//! The machine being provisioned.
//!
//! Package managers, service managers, downloaders and account tools are
//! opaque collaborators with a success/failure contract. [`Host`] is the
//! seam between them and the engine: [`SystemHost`] talks to the real
//! system, [`MockHost`] keeps everything in memory and records each call.

mod mock;
mod system;

pub use mock::{HostCall, MockHost};
pub use system::SystemHost;

use crate::error::Result;
use crate::shell::CommandResult;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Privilege a command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    User,
    Root,
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privilege::User => write!(f, "user"),
            Privilege::Root => write!(f, "root"),
        }
    }
}

/// Access to system state and mutations.
///
/// Read-only queries (`probe`, `hostname`, `login_shell`, `path_exists`)
/// always run, also in dry-run mode. Callers check [`Host::dry_run`] before
/// invoking a mutation.
pub trait Host {
    /// Whether mutations should only be described.
    fn dry_run(&self) -> bool;

    /// Run a command line. A non-zero exit is reported in the result, not
    /// as an error.
    fn run(&mut self, command: &str, privilege: Privilege) -> Result<CommandResult>;

    /// Run a read-only command and report whether it exited zero.
    fn probe(&mut self, command: &str) -> bool;

    fn hostname(&mut self) -> Result<String>;

    fn set_hostname(&mut self, name: &str) -> Result<()>;

    /// Login shell of the invoking user, if the account record has one.
    fn login_shell(&mut self) -> Result<Option<String>>;

    fn set_login_shell(&mut self, shell: &str) -> Result<()>;

    fn path_exists(&mut self, path: &Path) -> bool;

    /// Fail with `SettleError::Connectivity` unless `url` answers in time.
    fn check_connectivity(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Download `url` into memory.
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<Vec<u8>>;

    /// Write a user-owned file, creating parent directories.
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Whether the process already runs as root.
    fn is_elevated(&self) -> bool {
        false
    }
}

/// Probe command that succeeds when an RPM package is installed.
pub fn package_probe(package: &str) -> String {
    format!("rpm -q {}", crate::shell::quote(package))
}
