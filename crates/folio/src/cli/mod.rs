//! Command-line interface for folio.
//!
//! This module provides the CLI structure and command definitions for the
//! `folio` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ExportCommand, ImportCommand, SectionArg, ShowCommand, SyncCommand,
    TokenCommand,
};

/// folio - Own your portfolio content
///
/// Holds the portfolio site's content document, mirrors it to a local
/// cache, imports/exports it as JSON, and optionally syncs it to a
/// GitHub-hosted file.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resolved current document
    Show(ShowCommand),

    /// Export the document to a JSON file
    Export(ExportCommand),

    /// Import a JSON file as the new document
    Import(ImportCommand),

    /// Push the current document to the remote repository
    Sync(SyncCommand),

    /// Manage the remote API token
    #[command(subcommand)]
    Token(TokenCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "folio");
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli::try_parse_from(["folio", "-q", "show"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["folio", "show"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);

        let cli = Cli::try_parse_from(["folio", "-v", "show"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli::try_parse_from(["folio", "-vv", "show"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_show_with_section() {
        let cli = Cli::try_parse_from(["folio", "show", "--section", "projects"]).unwrap();
        match cli.command {
            Command::Show(cmd) => assert_eq!(cmd.section, Some(SectionArg::Projects)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_with_output() {
        let cli = Cli::try_parse_from(["folio", "export", "-o", "site.json"]).unwrap();
        match cli.command {
            Command::Export(cmd) => assert_eq!(cmd.output, Some(PathBuf::from("site.json"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_import_with_sync_flag() {
        let cli = Cli::try_parse_from(["folio", "import", "portfolio.json", "--sync"]).unwrap();
        match cli.command {
            Command::Import(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("portfolio.json"));
                assert!(cmd.sync);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_sync_with_message() {
        let cli = Cli::try_parse_from(["folio", "sync", "-m", "publish update"]).unwrap();
        match cli.command {
            Command::Sync(cmd) => assert_eq!(cmd.message.as_deref(), Some("publish update")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_token_set() {
        let cli = Cli::try_parse_from(["folio", "token", "set", "ghp_abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Token(TokenCommand::Set { .. })
        ));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["folio", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_with_config_path() {
        let cli = Cli::try_parse_from(["folio", "-c", "/custom/config.toml", "show"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
