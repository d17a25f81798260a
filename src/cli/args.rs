//! CLI argument definitions.
//!
//! `settle` has a single entry point and no subcommands.

use clap::Parser;
use std::path::PathBuf;

/// Settle - interactive post-install provisioning for Fedora workstations.
#[derive(Debug, Parser)]
#[command(name = "settle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to settings file (overrides ~/.config/settle/config.yml)
    #[arg(short, long, env = "SETTLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log what would change without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["settle", "--dry-run", "--config", "/tmp/c.yml", "--debug"]);
        assert!(cli.dry_run);
        assert!(cli.debug);
        assert!(!cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yml")));
    }

    #[test]
    fn rejects_subcommands() {
        assert!(Cli::try_parse_from(["settle", "run"]).is_err());
    }
}
