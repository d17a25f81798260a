//! Settings validation rules.
//!
//! - Hostnames must be valid RFC 1123 names
//! - Timeouts must be positive
//! - The log prefix must be a usable file name fragment
//! - Font checksums must be 64 hex characters

use regex::Regex;
use std::sync::OnceLock;

use crate::config::schema::Settings;
use crate::error::{Result, SettleError};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Setting the error refers to.
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

fn hostname_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
            .unwrap_or_else(|e| unreachable!("static hostname pattern: {}", e))
    })
}

/// Check a hostname against RFC 1123 rules.
pub fn validate_hostname(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("hostname cannot be empty".to_string());
    }
    if name.len() > 253 {
        return Err("hostname is longer than 253 characters".to_string());
    }
    if !hostname_regex().is_match(name) {
        return Err(
            "use letters, digits and hyphens; labels cannot start or end with a hyphen"
                .to_string(),
        );
    }
    Ok(())
}

/// Validate settings and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_settings(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |field: &str, message: String| {
        errors.push(ValidationError {
            field: field.to_string(),
            message,
        })
    };

    if let Some(hostname) = &settings.hostname {
        if let Err(message) = validate_hostname(hostname) {
            push("hostname", message);
        }
    }

    if settings.connectivity.timeout_secs == 0 {
        push("connectivity.timeout_secs", "must be greater than 0".into());
    }
    if settings.download_timeout_secs == 0 {
        push("download_timeout_secs", "must be greater than 0".into());
    }

    if settings.log_prefix.is_empty() || settings.log_prefix.contains(['/', '\\']) {
        push(
            "log_prefix",
            "must be non-empty and contain no path separators".into(),
        );
    }

    if settings.shell.is_empty() {
        push("shell", "cannot be empty".into());
    }

    for font in &settings.fonts {
        if font.name.is_empty() || font.name.contains(['/', '\\']) {
            push("fonts", format!("invalid font file name '{}'", font.name));
        }
        if let Some(sum) = &font.sha256 {
            if sum.len() != 64 || !sum.chars().all(|c| c.is_ascii_hexdigit()) {
                push(
                    "fonts",
                    format!("sha256 for '{}' must be 64 hex characters", font.name),
                );
            }
        }
    }

    errors
}

/// Validate settings, failing on the first batch of errors.
pub fn validate(settings: &Settings) -> Result<()> {
    let errors = validate_settings(settings);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(SettleError::ConfigValidationError { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::FontSource;

    #[test]
    fn default_settings_are_valid() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn hostname_rules() {
        assert!(validate_hostname("workstation").is_ok());
        assert!(validate_hostname("fedora-41").is_ok());
        assert!(validate_hostname("box.example.org").is_ok());

        assert!(validate_hostname("").is_err());
        assert!(validate_hostname("-leading").is_err());
        assert!(validate_hostname("trailing-").is_err());
        assert!(validate_hostname("has space").is_err());
        assert!(validate_hostname("under_score").is_err());
        assert!(validate_hostname(&"a".repeat(64)).is_err());
    }

    #[test]
    fn invalid_configured_hostname_is_reported() {
        let settings = Settings {
            hostname: Some("bad host".into()),
            ..Default::default()
        };
        let errors = validate_settings(&settings);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "hostname");
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let mut settings = Settings::default();
        settings.connectivity.timeout_secs = 0;
        settings.download_timeout_secs = 0;

        let errors = validate_settings(&settings);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn prefix_with_separator_is_rejected() {
        let settings = Settings {
            log_prefix: "../escape".into(),
            ..Default::default()
        };
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("log_prefix"));
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let settings = Settings {
            fonts: vec![FontSource {
                name: "Font.ttf".into(),
                url: "https://example.org/Font.ttf".into(),
                sha256: Some("abc".into()),
            }],
            ..Default::default()
        };
        let errors = validate_settings(&settings);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("64 hex"));
    }

    #[test]
    fn all_errors_collected() {
        let mut settings = Settings {
            hostname: Some("-".into()),
            log_prefix: String::new(),
            ..Default::default()
        };
        settings.connectivity.timeout_secs = 0;

        assert_eq!(validate_settings(&settings).len(), 3);
    }
}
