//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Series command arguments.
#[derive(Debug, Args)]
pub struct SeriesCommand {
    /// Show details for one series instead of listing all
    pub name: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Create command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Name for the new collection
    pub name: String,

    /// Coin series to create the collection from
    #[arg(short, long)]
    pub series: String,

    /// First year to include (series allowing it only)
    #[arg(long)]
    pub start_year: Option<u16>,

    /// Last year to include (series allowing it only)
    #[arg(long)]
    pub stop_year: Option<u16>,

    /// Mint marks to include, comma separated (e.g. "P,D")
    #[arg(short, long)]
    pub mint_marks: Option<String>,

    /// Enable a series option by key (repeatable)
    #[arg(long = "with", value_name = "OPTION")]
    pub with: Vec<String>,

    /// Disable a series option by key (repeatable)
    #[arg(long = "without", value_name = "OPTION")]
    pub without: Vec<String>,
}

impl CreateCommand {
    /// Parse the mint mark list, trimming and uppercasing each entry.
    #[must_use]
    pub fn mint_mark_list(&self) -> Option<Vec<String>> {
        self.mint_marks.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_uppercase)
                .collect()
        })
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Collection to show
    pub name: String,

    /// Only show slots still missing
    #[arg(long)]
    pub missing: bool,

    /// Only show collected slots
    #[arg(long)]
    pub collected: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Collect and uncollect command arguments.
#[derive(Debug, Args)]
pub struct MarkCommand {
    /// Collection to update
    pub name: String,

    /// Coin identifier, usually the year (e.g. "2015")
    pub identifier: String,

    /// Mint mark of the slot (omit for series without mint marks)
    pub mint_mark: Option<String>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Collection to delete
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Upgrade command arguments.
#[derive(Debug, Args)]
pub struct UpgradeCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Parse a configured format name, falling back to the default.
    #[must_use]
    pub fn from_config(name: &str) -> Self {
        match name {
            "plain" => Self::Plain,
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_mark_list_parsing() {
        let cmd = CreateCommand {
            name: "Mine".to_string(),
            series: "Presidential Dollars".to_string(),
            start_year: None,
            stop_year: None,
            mint_marks: Some("p, d ,".to_string()),
            with: Vec::new(),
            without: Vec::new(),
        };
        assert_eq!(
            cmd.mint_mark_list(),
            Some(vec!["P".to_string(), "D".to_string()])
        );
    }

    #[test]
    fn test_mint_mark_list_absent() {
        let cmd = CreateCommand {
            name: "Mine".to_string(),
            series: "Presidential Dollars".to_string(),
            start_year: None,
            stop_year: None,
            mint_marks: None,
            with: Vec::new(),
            without: Vec::new(),
        };
        assert_eq!(cmd.mint_mark_list(), None);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(OutputFormat::from_config("plain"), OutputFormat::Plain);
        assert_eq!(OutputFormat::from_config("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_config("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from_config("anything"), OutputFormat::Table);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_mark_command_debug() {
        let cmd = MarkCommand {
            name: "Mine".to_string(),
            identifier: "2015".to_string(),
            mint_mark: Some("P".to_string()),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("2015"));
    }
}
