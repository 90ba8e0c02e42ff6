//! Command-line interface for coinshelf.
//!
//! This module provides the CLI structure and command handlers for the
//! `cshelf` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CreateCommand, DeleteCommand, ListCommand, MarkCommand, OutputFormat,
    SeriesCommand, ShowCommand, StatsCommand, UpgradeCommand,
};

/// cshelf - Track your coin collections
///
/// Keeps a local catalog of coin collections: pick a series, choose years and
/// mint marks, and check coins off as you find them.
#[derive(Debug, Parser)]
#[command(name = "cshelf")]
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
    /// List available coin series or show one in detail
    Series(SeriesCommand),

    /// Create a new collection
    Create(CreateCommand),

    /// List collections with progress
    List(ListCommand),

    /// Show the slots of a collection
    Show(ShowCommand),

    /// Mark a coin as collected
    Collect(MarkCommand),

    /// Mark a coin as not collected
    Uncollect(MarkCommand),

    /// Delete a collection
    Delete(DeleteCommand),

    /// Bring collections up to date with the current catalog
    Upgrade(UpgradeCommand),

    /// Show database statistics
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "cshelf");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli::try_parse_from(["cshelf", "-q", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["cshelf", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);

        let cli = Cli::try_parse_from(["cshelf", "-v", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli::try_parse_from(["cshelf", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_series() {
        let cli = Cli::try_parse_from(["cshelf", "series"]).unwrap();
        assert!(matches!(cli.command, Command::Series(_)));
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "cshelf",
            "create",
            "My Presidents",
            "--series",
            "Presidential Dollars",
            "--start-year",
            "2008",
            "--mint-marks",
            "P,D",
        ])
        .unwrap();
        match cli.command {
            Command::Create(cmd) => {
                assert_eq!(cmd.name, "My Presidents");
                assert_eq!(cmd.series, "Presidential Dollars");
                assert_eq!(cmd.start_year, Some(2008));
                assert_eq!(
                    cmd.mint_mark_list(),
                    Some(vec!["P".to_string(), "D".to_string()])
                );
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_with_options() {
        let cli = Cli::try_parse_from([
            "cshelf",
            "create",
            "Innovation",
            "-s",
            "American Innovation Dollars",
            "--with",
            "introductory",
        ])
        .unwrap();
        match cli.command {
            Command::Create(cmd) => assert_eq!(cmd.with, vec!["introductory".to_string()]),
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_without_option() {
        let cli = Cli::try_parse_from([
            "cshelf",
            "create",
            "Innovation",
            "-s",
            "american-innovation-dollars",
            "--without",
            "introductory",
        ])
        .unwrap();
        match cli.command {
            Command::Create(cmd) => assert_eq!(cmd.without, vec!["introductory".to_string()]),
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_collect() {
        let cli = Cli::try_parse_from(["cshelf", "collect", "Mine", "2015", "P"]).unwrap();
        match cli.command {
            Command::Collect(cmd) => {
                assert_eq!(cmd.name, "Mine");
                assert_eq!(cmd.identifier, "2015");
                assert_eq!(cmd.mint_mark.as_deref(), Some("P"));
            }
            other => panic!("expected collect, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_collect_without_mark() {
        let cli = Cli::try_parse_from(["cshelf", "collect", "Mine", "2015"]).unwrap();
        match cli.command {
            Command::Collect(cmd) => assert_eq!(cmd.mint_mark, None),
            other => panic!("expected collect, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_show_with_filters() {
        let cli = Cli::try_parse_from(["cshelf", "show", "Mine", "--missing"]).unwrap();
        match cli.command {
            Command::Show(cmd) => {
                assert!(cmd.missing);
                assert!(!cmd.collected);
            }
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_delete_with_yes() {
        let cli = Cli::try_parse_from(["cshelf", "delete", "Mine", "--yes"]).unwrap();
        match cli.command {
            Command::Delete(cmd) => assert!(cmd.yes),
            other => panic!("expected delete, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_upgrade() {
        let cli = Cli::try_parse_from(["cshelf", "upgrade", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Upgrade(_)));
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["cshelf", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_with_config_flag() {
        let cli = Cli::try_parse_from(["cshelf", "-c", "/custom/config.toml", "list"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
