//! Settings loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use settle::config::{parse_settings, validate};
//! use std::path::Path;
//!
//! let settings = parse_settings("hostname: devbox", Path::new("config.yml")).unwrap();
//! validate(&settings).unwrap();
//! assert_eq!(settings.hostname, Some("devbox".to_string()));
//! ```
//!
//! # Settings File Location
//!
//! 1. `--config <path>` or `SETTLE_CONFIG`
//! 2. `<config_dir>/settle/config.yml`
//! 3. Built-in defaults

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{default_config_path, load_settings, load_settings_file, parse_settings};
pub use schema::{ConnectivitySettings, FontSource, Settings};
pub use validator::{validate, validate_hostname, validate_settings, ValidationError};
