//! Idempotency guards.
//!
//! A guard is a predicate over current system state, evaluated immediately
//! before an action's mutation. When it holds, the mutation is skipped.

use crate::host::{package_probe, Host};
use std::fmt;
use std::path::PathBuf;

/// Result of evaluating a guard.
///
/// The `description` is user-visible: it appears in skip messages
/// ("Skipping Set hostname: hostname is already workstation").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Whether the target state already holds.
    pub satisfied: bool,

    /// What was checked.
    pub description: String,
}

impl CheckResult {
    pub fn satisfied(description: impl Into<String>) -> Self {
        Self {
            satisfied: true,
            description: description.into(),
        }
    }

    pub fn unsatisfied(description: impl Into<String>) -> Self {
        Self {
            satisfied: false,
            description: description.into(),
        }
    }
}

type Predicate = Box<dyn Fn(&mut dyn Host) -> bool>;

/// A named predicate that says an action's work is already done.
pub struct Guard {
    description: String,
    predicate: Predicate,
}

impl Guard {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&mut dyn Host) -> bool + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Satisfied when the RPM package is installed.
    pub fn package_installed(package: impl Into<String>) -> Self {
        let package = package.into();
        let command = package_probe(&package);
        Self::new(format!("{} is already installed", package), move |host| {
            host.probe(&command)
        })
    }

    /// Satisfied when the path exists.
    pub fn path_exists(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(format!("{} already exists", path.display()), move |host| {
            host.path_exists(&path)
        })
    }

    /// Satisfied when `command` exits zero.
    pub fn probe(description: impl Into<String>, command: impl Into<String>) -> Self {
        let command = command.into();
        Self::new(description, move |host| host.probe(&command))
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluate against the current system state.
    pub fn check(&self, host: &mut dyn Host) -> CheckResult {
        let satisfied = (self.predicate)(host);
        tracing::debug!(guard = %self.description, satisfied, "guard evaluated");
        if satisfied {
            CheckResult::satisfied(&self.description)
        } else {
            CheckResult::unsatisfied(&self.description)
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, MockHost};

    #[test]
    fn package_guard_probes_rpm() {
        let mut host = MockHost::new();
        host.mark_installed("zsh");

        let result = Guard::package_installed("zsh").check(&mut host);
        assert!(result.satisfied);
        assert_eq!(result.description, "zsh is already installed");
        assert_eq!(host.calls(), &[HostCall::Probe("rpm -q zsh".into())]);

        assert!(!Guard::package_installed("fish").check(&mut host).satisfied);
    }

    #[test]
    fn path_guard() {
        let mut host = MockHost::new();
        let guard = Guard::path_exists("/etc/yum.repos.d/rpmfusion-free.repo");
        assert!(!guard.check(&mut host).satisfied);

        host.add_path("/etc/yum.repos.d/rpmfusion-free.repo");
        assert!(guard.check(&mut host).satisfied);
    }

    #[test]
    fn custom_predicate_sees_host_state() {
        let mut host = MockHost::new();
        host.set_current_hostname("devbox");

        let guard = Guard::new("hostname is already devbox", |host| {
            host.hostname().map(|h| h == "devbox").unwrap_or(false)
        });
        assert!(guard.check(&mut host).satisfied);
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn probe_guard_uses_command() {
        let mut host = MockHost::new();
        host.set_probe("flatpak remotes | grep -q flathub", true);

        let guard = Guard::probe("Flathub is already enabled", "flatpak remotes | grep -q flathub");
        assert!(guard.check(&mut host).satisfied);
    }

    #[test]
    fn debug_shows_description() {
        let guard = Guard::path_exists("/tmp/x");
        assert!(format!("{:?}", guard).contains("/tmp/x already exists"));
    }
}
