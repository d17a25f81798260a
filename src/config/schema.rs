//! Settings schema.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.
//!
//! ```yaml
//! log_dir: /home/me/provisioning-logs
//! hostname: workstation
//! shell: /usr/bin/fish
//! connectivity:
//!   url: https://fedoraproject.org
//!   timeout_secs: 5
//! applications: [htop, neovim]
//! fonts:
//!   - name: FiraCode-Regular.ttf
//!     url: https://example.org/FiraCode-Regular.ttf
//!     sha256: 0123...
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory for session logs. Defaults to `<data_local_dir>/settle/logs`.
    pub log_dir: Option<PathBuf>,

    /// File name prefix for session logs.
    pub log_prefix: String,

    /// Network reachability check run before anything else.
    pub connectivity: ConnectivitySettings,

    /// Hostname to set. When absent the hostname step asks for one.
    pub hostname: Option<String>,

    /// Login shell to switch to.
    pub shell: String,

    /// Package providing `shell`.
    pub shell_package: String,

    /// Packages installed by the applications step.
    pub applications: Vec<String>,

    /// Flatpak application ids installed from Flathub.
    pub flatpaks: Vec<String>,

    /// Fonts downloaded by the fonts step.
    pub fonts: Vec<FontSource>,

    /// Where downloaded fonts are placed. Defaults to `~/.local/share/fonts`.
    pub font_dir: Option<PathBuf>,

    /// Timeout for each font download.
    pub download_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_prefix: "settle".to_string(),
            connectivity: ConnectivitySettings::default(),
            hostname: None,
            shell: "/usr/bin/zsh".to_string(),
            shell_package: "zsh".to_string(),
            applications: default_applications(),
            flatpaks: default_flatpaks(),
            fonts: default_fonts(),
            font_dir: None,
            download_timeout_secs: 120,
        }
    }
}

impl Settings {
    /// Resolved log directory.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("settle")
                .join("logs")
        })
    }

    /// Resolved font directory.
    pub fn font_dir(&self) -> PathBuf {
        self.font_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
                .join("fonts")
        })
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Connectivity check target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectivitySettings {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            url: "https://fedoraproject.org".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ConnectivitySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A font file to download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FontSource {
    /// File name under the font directory.
    pub name: String,
    pub url: String,
    /// Expected SHA-256 of the file, hex encoded.
    #[serde(default)]
    pub sha256: Option<String>,
}

fn default_applications() -> Vec<String> {
    [
        "git",
        "htop",
        "neovim",
        "gnome-tweaks",
        "vlc",
        "fastfetch",
        "util-linux-user",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_flatpaks() -> Vec<String> {
    ["com.github.tchx84.Flatseal", "org.mozilla.Thunderbird"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_fonts() -> Vec<FontSource> {
    const BASE: &str = "https://github.com/ryanoasis/nerd-fonts/raw/HEAD/patched-fonts/JetBrainsMono/Ligatures";
    ["Regular", "Bold", "Italic"]
        .into_iter()
        .map(|style| FontSource {
            name: format!("JetBrainsMonoNerdFont-{}.ttf", style),
            url: format!("{}/{}/JetBrainsMonoNerdFont-{}.ttf", BASE, style, style),
            sha256: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_connectivity_keeps_other_default() {
        let settings: Settings =
            serde_yaml::from_str("connectivity:\n  url: http://localhost:8080\n").unwrap();
        assert_eq!(settings.connectivity.url, "http://localhost:8080");
        assert_eq!(settings.connectivity.timeout_secs, 10);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<Settings, _> = serde_yaml::from_str("hostnme: typo\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_dirs_win() {
        let settings = Settings {
            log_dir: Some(PathBuf::from("/tmp/logs")),
            font_dir: Some(PathBuf::from("/tmp/fonts")),
            ..Default::default()
        };
        assert_eq!(settings.log_dir(), PathBuf::from("/tmp/logs"));
        assert_eq!(settings.font_dir(), PathBuf::from("/tmp/fonts"));
    }

    #[test]
    fn default_log_dir_ends_with_logs() {
        assert!(Settings::default().log_dir().ends_with("settle/logs"));
    }

    #[test]
    fn default_fonts_have_unique_names() {
        let fonts = default_fonts();
        assert_eq!(fonts.len(), 3);
        assert!(fonts.iter().all(|f| f.url.ends_with(&f.name)));
    }
}
