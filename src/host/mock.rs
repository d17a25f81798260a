//! In-memory host for testing.

use super::{package_probe, Host, Privilege};
use crate::error::{Result, SettleError};
use crate::shell::CommandResult;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A call made against a [`MockHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Run {
        command: String,
        privilege: Privilege,
    },
    Probe(String),
    SetHostname(String),
    SetLoginShell(String),
    WriteFile(PathBuf),
    CheckConnectivity(String),
    Fetch(String),
}

impl HostCall {
    /// Whether this call changes system state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            HostCall::Run { .. }
                | HostCall::SetHostname(_)
                | HostCall::SetLoginShell(_)
                | HostCall::WriteFile(_)
        )
    }
}

/// Mock host that records calls and keeps system state in memory.
///
/// Commands succeed unless registered with [`MockHost::fail_command`].
/// Probes fail unless registered with [`MockHost::set_probe`] or
/// [`MockHost::mark_installed`].
#[derive(Debug, Default)]
pub struct MockHost {
    calls: Vec<HostCall>,
    dry_run: bool,
    elevated: bool,
    hostname: String,
    login_shell: Option<String>,
    probes: HashMap<String, bool>,
    failing_commands: HashMap<String, i32>,
    paths: HashSet<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
    unreachable: bool,
    downloads: HashMap<String, Vec<u8>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            hostname: "localhost".to_string(),
            login_shell: Some("/bin/bash".to_string()),
            ..Default::default()
        }
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn set_elevated(&mut self, elevated: bool) {
        self.elevated = elevated;
    }

    pub fn set_current_hostname(&mut self, name: impl Into<String>) {
        self.hostname = name.into();
    }

    pub fn set_current_login_shell(&mut self, shell: Option<&str>) {
        self.login_shell = shell.map(String::from);
    }

    /// Set the outcome of a probe command.
    pub fn set_probe(&mut self, command: impl Into<String>, ok: bool) {
        self.probes.insert(command.into(), ok);
    }

    /// Make the installed-package probe for `package` succeed.
    pub fn mark_installed(&mut self, package: &str) {
        self.set_probe(package_probe(package), true);
    }

    /// Make any command containing `pattern` exit with `code`.
    pub fn fail_command(&mut self, pattern: impl Into<String>, code: i32) {
        self.failing_commands.insert(pattern.into(), code);
    }

    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    pub fn set_unreachable(&mut self, unreachable: bool) {
        self.unreachable = unreachable;
    }

    /// Serve `body` for downloads of `url`. Other URLs fail.
    pub fn serve(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.downloads.insert(url.into(), body.into());
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Recorded calls that change system state.
    pub fn mutations(&self) -> Vec<&HostCall> {
        self.calls.iter().filter(|c| c.is_mutation()).collect()
    }

    /// Command lines passed to `run`, in order.
    pub fn commands(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Run { command, .. } => Some(command.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn ran(&self, fragment: &str) -> bool {
        self.commands().iter().any(|c| c.contains(fragment))
    }

    pub fn current_hostname(&self) -> &str {
        &self.hostname
    }

    pub fn current_login_shell(&self) -> Option<&str> {
        self.login_shell.as_deref()
    }

    pub fn file(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Host for MockHost {
    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn run(&mut self, command: &str, privilege: Privilege) -> Result<CommandResult> {
        self.calls.push(HostCall::Run {
            command: command.to_string(),
            privilege,
        });

        let failure = self
            .failing_commands
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, code)| *code);

        Ok(match failure {
            Some(code) => {
                CommandResult::failure(Some(code), String::new(), String::new(), Duration::ZERO)
            }
            None => CommandResult::success(String::new(), String::new(), Duration::ZERO),
        })
    }

    fn probe(&mut self, command: &str) -> bool {
        self.calls.push(HostCall::Probe(command.to_string()));
        self.probes.get(command).copied().unwrap_or(false)
    }

    fn hostname(&mut self) -> Result<String> {
        Ok(self.hostname.clone())
    }

    fn set_hostname(&mut self, name: &str) -> Result<()> {
        self.calls.push(HostCall::SetHostname(name.to_string()));
        self.hostname = name.to_string();
        Ok(())
    }

    fn login_shell(&mut self) -> Result<Option<String>> {
        Ok(self.login_shell.clone())
    }

    fn set_login_shell(&mut self, shell: &str) -> Result<()> {
        self.calls.push(HostCall::SetLoginShell(shell.to_string()));
        self.login_shell = Some(shell.to_string());
        Ok(())
    }

    fn path_exists(&mut self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    fn check_connectivity(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.calls.push(HostCall::CheckConnectivity(url.to_string()));
        if self.unreachable {
            return Err(SettleError::Connectivity {
                url: url.to_string(),
                message: "network is unreachable".to_string(),
            });
        }
        Ok(())
    }

    fn fetch(&mut self, url: &str, _timeout: Duration) -> Result<Vec<u8>> {
        self.calls.push(HostCall::Fetch(url.to_string()));
        self.downloads
            .get(url)
            .cloned()
            .ok_or_else(|| SettleError::Download {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            })
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        self.calls.push(HostCall::WriteFile(path.to_path_buf()));
        self.paths.insert(path.to_path_buf());
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn is_elevated(&self) -> bool {
        self.elevated
    }
}
