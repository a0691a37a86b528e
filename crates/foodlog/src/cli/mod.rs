//! Command-line interface for foodlog.
//!
//! This module provides the CLI structure and output rendering for the
//! `foodlog` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, FoodFields, ListCommand, OutputFormat,
    ShowCommand, StatusCommand,
};

/// foodlog - Keep a log of what you eat
///
/// Records foods with their category, weight, nutrition values and an
/// optional photo, stored locally on this machine.
#[derive(Debug, Parser)]
#[command(name = "foodlog")]
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
    /// Log a new food
    Add(AddCommand),

    /// Change a logged food
    Edit(EditCommand),

    /// List logged foods
    List(ListCommand),

    /// Show one logged food
    Show(ShowCommand),

    /// Delete a logged food
    Delete(DeleteCommand),

    /// List the food categories
    Categories,

    /// Show storage status
    Status(StatusCommand),

    /// View or check configuration
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
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "foodlog");
    }

    #[test]
    fn test_verbosity_from_flags() {
        use crate::logging::Verbosity;

        for (verbose, quiet, expected) in [
            (0, true, Verbosity::Quiet),
            (2, true, Verbosity::Quiet),
            (0, false, Verbosity::Normal),
            (1, false, Verbosity::Verbose),
            (2, false, Verbosity::Trace),
            (5, false, Verbosity::Trace),
        ] {
            let cli = Cli {
                config: None,
                verbose,
                quiet,
                command: Command::Categories,
            };
            assert_eq!(cli.verbosity(), expected, "verbose={verbose} quiet={quiet}");
        }
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let args = vec![
            "foodlog", "add", "Apple Pie", "--category", "snack", "-w", "150", "--calories",
            "380",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(add.name, "Apple Pie");
        assert_eq!(add.fields.category.as_deref(), Some("snack"));
        assert_eq!(add.fields.weight.as_deref(), Some("150"));
        assert_eq!(add.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_edit_no_image_conflicts_with_image() {
        let args = vec!["foodlog", "edit", "1", "--no-image", "-i", "/tmp/a.jpg"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = vec!["foodlog", "edit", "1", "--no-image", "-n", "Tea"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Edit(edit) = cli.command else {
            panic!("expected edit command");
        };
        assert!(edit.no_image);
        assert_eq!(edit.name.as_deref(), Some("Tea"));
    }

    #[test]
    fn test_parse_list() {
        let args = vec!["foodlog", "list", "-s", "pie", "--group", "-f", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(list.search.as_deref(), Some("pie"));
        assert!(list.group);
        assert_eq!(list.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_delete_yes() {
        let args = vec!["foodlog", "delete", "1700000000000", "--yes"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Delete(delete) = cli.command else {
            panic!("expected delete command");
        };
        assert_eq!(delete.id, "1700000000000");
        assert!(delete.yes);
    }

    #[test]
    fn test_parse_categories() {
        let cli = Cli::try_parse_from(vec!["foodlog", "categories"]).unwrap();
        assert!(matches!(cli.command, Command::Categories));
    }

    #[test]
    fn test_parse_status() {
        let args = vec!["foodlog", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["foodlog", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["foodlog", "-v", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["foodlog", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
