//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::form::FoodForm;

/// Food fields that can be given on the command line.
///
/// Fields left out keep the form's current value.
#[derive(Debug, Default, Args)]
pub struct FoodFields {
    /// Category label (see `foodlog categories`)
    #[arg(long)]
    pub category: Option<String>,

    /// Energy in kcal
    #[arg(long)]
    pub calories: Option<String>,

    /// Portion weight in grams
    #[arg(short, long)]
    pub weight: Option<String>,

    /// Protein in grams
    #[arg(long)]
    pub protein: Option<String>,

    /// Carbohydrates in grams
    #[arg(long)]
    pub carbs: Option<String>,

    /// Fat in grams
    #[arg(long)]
    pub fat: Option<String>,

    /// Dietary fibre in grams
    #[arg(long)]
    pub fiber: Option<String>,

    /// Photo to attach; it is copied into the data directory
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

impl FoodFields {
    /// Write the given fields into `form`.
    pub fn apply_to(self, form: &mut FoodForm) {
        let slots = [
            (self.category, &mut form.category),
            (self.calories, &mut form.calories),
            (self.weight, &mut form.weight),
            (self.protein, &mut form.protein),
            (self.carbs, &mut form.carbs),
            (self.fat, &mut form.fat),
            (self.fiber, &mut form.fiber),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if self.image.is_some() {
            form.image = self.image;
        }
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Name of the food
    pub name: String,

    #[command(flatten)]
    pub fields: FoodFields,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the record to edit
    pub id: String,

    /// New name of the food
    #[arg(short, long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub fields: FoodFields,

    /// Detach the current photo
    #[arg(long, conflicts_with = "image")]
    pub no_image: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show foods whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Group foods by category
    #[arg(short, long)]
    pub group: bool,

    /// Print nutrition totals of the listed foods
    #[arg(short, long)]
    pub totals: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the record to show
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the record to delete
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
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
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_apply_to_overwrites_given_fields_only() {
        let mut form = FoodForm {
            food_name: "Rice".to_string(),
            weight: "100".to_string(),
            calories: "130".to_string(),
            ..FoodForm::new()
        };
        let fields = FoodFields {
            weight: Some("150".to_string()),
            category: Some("staple".to_string()),
            image: Some(PathBuf::from("/tmp/rice.jpg")),
            ..FoodFields::default()
        };

        fields.apply_to(&mut form);

        assert_eq!(form.food_name, "Rice");
        assert_eq!(form.weight, "150");
        assert_eq!(form.calories, "130");
        assert_eq!(form.category, "staple");
        assert_eq!(form.image, Some(PathBuf::from("/tmp/rice.jpg")));
    }

    #[test]
    fn test_apply_to_keeps_image_when_not_given() {
        let mut form = FoodForm {
            image: Some(PathBuf::from("/data/images/1_2.jpg")),
            ..FoodForm::new()
        };
        FoodFields::default().apply_to(&mut form);
        assert_eq!(form.image, Some(PathBuf::from("/data/images/1_2.jpg")));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
