//! Settings file discovery and loading.

use crate::config::schema::Settings;
use crate::config::validator::validate;
use crate::error::{Result, SettleError};
use std::fs;
use std::path::{Path, PathBuf};

/// The per-user settings file: `<config_dir>/settle/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("settle").join("config.yml"))
}

/// Load a single settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SettleError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SettleError::Io(e)
        }
    })?;

    parse_settings(&content, path)
}

/// Parse YAML content into [`Settings`].
///
/// An empty document yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| SettleError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate settings.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and the built-in defaults otherwise.
pub fn load_settings(config_override: Option<&Path>) -> Result<Settings> {
    let settings = match config_override {
        Some(path) => load_settings_file(path)?,
        None => match default_config_path() {
            Some(path) if path.is_file() => load_settings_file(&path)?,
            _ => {
                tracing::debug!("no settings file found, using defaults");
                Settings::default()
            }
        },
    };

    validate(&settings)?;
    Ok(settings)
}
