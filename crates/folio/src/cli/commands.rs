//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Limit output to a single section
    #[arg(short, long, value_enum)]
    pub section: Option<SectionArg>,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file path (defaults to ./portfolio.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file to import
    pub file: PathBuf,

    /// Push the imported document to the remote after importing
    #[arg(long)]
    pub sync: bool,
}

/// Sync command arguments.
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Custom commit message (defaults to the configured prefix plus a timestamp)
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Token management commands.
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store the remote API token
    Set {
        /// The token value
        token: String,
    },

    /// Show whether a token is configured (the value is masked)
    Show,

    /// Remove the stored token
    Clear,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Document section selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    /// Profile/hero section
    Profile,
    /// About section
    About,
    /// Skill categories
    Skills,
    /// Certifications
    Certifications,
    /// Education entries
    Education,
    /// Experience entries
    Experience,
    /// Projects
    Projects,
    /// Contact details
    Contact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_command_debug() {
        let cmd = ShowCommand {
            section: Some(SectionArg::Projects),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Projects"));
    }

    #[test]
    fn test_export_command_debug() {
        let cmd = ExportCommand {
            output: Some(PathBuf::from("out.json")),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("out.json"));
    }

    #[test]
    fn test_import_command_debug() {
        let cmd = ImportCommand {
            file: PathBuf::from("in.json"),
            sync: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("sync"));
    }

    #[test]
    fn test_token_command_debug() {
        let cmd = TokenCommand::Show;
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_section_arg_clone() {
        let arg = SectionArg::Contact;
        let cloned = arg;
        assert_eq!(arg, cloned);
    }
}
