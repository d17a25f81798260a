//! The real machine.

use super::{Host, Privilege};
use crate::error::{Result, SettleError};
use crate::shell::{
    current_uid, execute, execute_check, execute_quiet, is_elevated, parse_login_shell,
    parse_passwd, quote, CommandOptions, CommandResult, PasswdEntry,
};
use std::fs;
use std::path::Path;
use std::time::Duration;

const PASSWD_PATH: &str = "/etc/passwd";
const USER_AGENT: &str = concat!("settle/", env!("CARGO_PKG_VERSION"));

/// [`Host`] backed by the local system.
///
/// Privileged commands are prefixed with `sudo` unless already root.
#[derive(Debug)]
pub struct SystemHost {
    dry_run: bool,
    elevated: bool,
}

impl SystemHost {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            elevated: is_elevated(),
        }
    }

    fn command_line(&self, command: &str, privilege: Privilege) -> String {
        match privilege {
            Privilege::Root if !self.elevated => format!("sudo {}", command),
            _ => command.to_string(),
        }
    }

    fn run_checked(&mut self, command: &str, privilege: Privilege) -> Result<()> {
        let result = self.run(command, privilege)?;
        if result.success {
            Ok(())
        } else {
            Err(SettleError::CommandFailed {
                command: command.to_string(),
                code: result.exit_code,
            })
        }
    }

    fn client(timeout: Duration) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SettleError::Other(e.into()))
    }

    fn uid() -> Result<u32> {
        current_uid().ok_or_else(|| {
            SettleError::Other(anyhow::anyhow!("user accounts are not supported here"))
        })
    }

    fn current_user(&self) -> Result<PasswdEntry> {
        let uid = Self::uid()?;
        let content = fs::read_to_string(PASSWD_PATH)?;
        parse_passwd(&content)
            .into_iter()
            .find(|entry| entry.uid == uid)
            .ok_or_else(|| {
                SettleError::Other(anyhow::anyhow!("no {} entry for uid {}", PASSWD_PATH, uid))
            })
    }
}

impl Host for SystemHost {
    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn run(&mut self, command: &str, privilege: Privilege) -> Result<CommandResult> {
        let line = self.command_line(command, privilege);
        // output goes straight to the terminal so long package transactions
        // show their own progress
        execute(&line, &CommandOptions::default())
    }

    fn probe(&mut self, command: &str) -> bool {
        let ok = execute_check(command);
        tracing::debug!(command, ok, "probe");
        ok
    }

    fn hostname(&mut self) -> Result<String> {
        if let Ok(name) = fs::read_to_string("/etc/hostname") {
            let name = name.trim();
            if !name.is_empty() {
                return Ok(name.to_string());
            }
        }
        let result = execute_quiet("hostname")?;
        Ok(result.stdout.trim().to_string())
    }

    fn set_hostname(&mut self, name: &str) -> Result<()> {
        self.run_checked(
            &format!("hostnamectl set-hostname {}", quote(name)),
            Privilege::Root,
        )
    }

    fn login_shell(&mut self) -> Result<Option<String>> {
        let uid = Self::uid()?;
        let content = fs::read_to_string(PASSWD_PATH)?;
        Ok(parse_login_shell(&content, uid))
    }

    fn set_login_shell(&mut self, shell: &str) -> Result<()> {
        let user = self.current_user()?;
        self.run_checked(
            &format!("chsh -s {} {}", quote(shell), quote(&user.name)),
            Privilege::Root,
        )
    }

    fn path_exists(&mut self, path: &Path) -> bool {
        path.exists()
    }

    fn check_connectivity(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let unreachable = |message: String| SettleError::Connectivity {
            url: url.to_string(),
            message,
        };

        let client = Self::client(timeout)?;
        let response = client
            .get(url)
            .send()
            .map_err(|e| unreachable(e.to_string()))?;

        tracing::debug!(url, status = %response.status(), "connectivity probe");
        if response.status().is_server_error() {
            return Err(unreachable(format!("HTTP {}", response.status())));
        }
        Ok(())
    }

    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let failed = |message: String| SettleError::Download {
            url: url.to_string(),
            message,
        };

        let client = Self::client(timeout)?;
        let response = client.get(url).send().map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
        tracing::debug!(url, size = bytes.len(), "downloaded");
        Ok(bytes.to_vec())
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn is_elevated(&self) -> bool {
        self.elevated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn host() -> SystemHost {
        SystemHost {
            dry_run: false,
            elevated: false,
        }
    }

    #[test]
    fn root_commands_use_sudo_when_not_elevated() {
        let host = host();
        assert_eq!(
            host.command_line("dnf upgrade -y", Privilege::Root),
            "sudo dnf upgrade -y"
        );
        assert_eq!(host.command_line("flatpak list", Privilege::User), "flatpak list");
    }

    #[test]
    fn root_commands_run_bare_when_elevated() {
        let host = SystemHost {
            dry_run: false,
            elevated: true,
        };
        assert_eq!(host.command_line("dnf upgrade -y", Privilege::Root), "dnf upgrade -y");
    }

    #[test]
    fn probe_reports_exit_status() {
        let mut host = host();
        assert!(host.probe("true"));
        assert!(!host.probe("false"));
    }

    #[test]
    fn connectivity_succeeds_on_reachable_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200);
        });

        let mut host = host();
        host.check_connectivity(&server.url("/"), Duration::from_secs(5))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn connectivity_fails_on_refused_connection() {
        let mut host = host();
        let err = host
            .check_connectivity("http://127.0.0.1:9/", Duration::from_secs(2))
            .unwrap_err();
        assert!(matches!(err, SettleError::Connectivity { .. }));
    }

    #[test]
    fn fetch_returns_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/font.ttf");
            then.status(200).body("glyphs");
        });

        let mut host = host();
        let bytes = host
            .fetch(&server.url("/font.ttf"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(bytes, b"glyphs");
    }

    #[test]
    fn fetch_maps_http_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let mut host = host();
        let err = host
            .fetch(&server.url("/missing"), Duration::from_secs(5))
            .unwrap_err();
        match err {
            SettleError::Download { message, .. } => assert!(message.contains("404")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn write_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/c.txt");

        let mut host = host();
        host.write_file(&path, b"hello").unwrap();

        assert!(host.path_exists(&path));
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }
}
