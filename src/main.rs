//! Settle CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use settle::cli::{Cli, ProvisionCommand, CONFIG_ERROR_EXIT_CODE};
use settle::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for diagnostics.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Diagnostics go to stderr; stdout carries the prompt protocol.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("settle=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("settle=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("settle starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let command = match ProvisionCommand::from_cli(&cli) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(CONFIG_ERROR_EXIT_CODE as u8);
        }
    };

    let mut ui = create_ui();
    let result = command.execute(ui.as_mut());
    ExitCode::from(result.exit_code as u8)
}
