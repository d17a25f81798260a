//! Command-line interface for settle.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`provision`] - The provisioning command

pub mod args;
pub mod provision;

pub use args::Cli;
pub use provision::{CommandResult, ProvisionCommand, CONFIG_ERROR_EXIT_CODE};
