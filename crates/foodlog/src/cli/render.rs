//! Text rendering of records for the terminal.

use std::fmt::Write as _;

use serde::Serialize;

use super::OutputFormat;
use crate::error::Result;
use crate::list::CategoryGroup;
use crate::record::{FoodRecord, NutritionTotals};

/// Widest name shown in a table before it is cut.
const NAME_WIDTH: usize = 24;

/// One group as written in JSON output.
#[derive(Serialize)]
struct GroupOut<'a> {
    category: &'a str,
    color: &'a str,
    records: &'a [&'a FoodRecord],
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let cut: String = name.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn table_header(out: &mut String) {
    let _ = writeln!(
        out,
        "{:<14} {:<NAME_WIDTH$} {:<14} {:>8} {:>8}",
        "ID", "NAME", "CATEGORY", "WEIGHT", "KCAL"
    );
    let _ = writeln!(out, "{}", "-".repeat(14 + NAME_WIDTH + 14 + 8 + 8 + 4));
}

fn table_row(out: &mut String, record: &FoodRecord) {
    let _ = writeln!(
        out,
        "{:<14} {:<NAME_WIDTH$} {:<14} {:>8} {:>8}",
        record.id,
        truncate(&record.food_name, NAME_WIDTH),
        record.category.label(),
        record.weight,
        record.calories
    );
}

fn plain_row(out: &mut String, record: &FoodRecord) {
    let _ = writeln!(
        out,
        "{}  {} ({}, {} g, {} kcal)",
        record.id,
        record.food_name,
        record.category.label(),
        record.weight,
        record.calories
    );
}

/// Render a list of records.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn records(records: &[&FoodRecord], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => out = serde_json::to_string_pretty(records)?,
        OutputFormat::Table => {
            table_header(&mut out);
            for record in records {
                table_row(&mut out, record);
            }
        }
        OutputFormat::Plain => {
            for record in records {
                plain_row(&mut out, record);
            }
        }
    }
    if records.is_empty() && format != OutputFormat::Json {
        out.push_str("No food records.\n");
    }
    Ok(out)
}

/// Render records grouped by category.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn groups(groups: &[CategoryGroup<'_>], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let out: Vec<GroupOut<'_>> = groups
            .iter()
            .map(|g| GroupOut {
                category: g.category.label(),
                color: g.color,
                records: &g.records,
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let mut out = String::new();
    for group in groups {
        let _ = writeln!(
            out,
            "== {} ({}) [{}] ==",
            group.category.label(),
            group.records.len(),
            group.color
        );
        if format == OutputFormat::Table {
            table_header(&mut out);
        }
        for record in &group.records {
            if format == OutputFormat::Table {
                table_row(&mut out, record);
            } else {
                plain_row(&mut out, record);
            }
        }
        out.push('\n');
    }
    if groups.is_empty() {
        out.push_str("No food records.\n");
    }
    Ok(out)
}

/// Render every field of one record.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn record(record: &FoodRecord, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(record)?);
    }

    let mut out = String::new();
    let fields = [
        ("Id", record.id.as_str()),
        ("Name", record.food_name.as_str()),
        ("Category", record.category.label()),
        ("Calories", record.calories.as_str()),
        ("Weight", record.weight.as_str()),
        ("Protein", record.protein.as_str()),
        ("Carbs", record.carbs.as_str()),
        ("Fat", record.fat.as_str()),
        ("Fiber", record.fiber.as_str()),
        ("Image", record.image_uri.as_deref().unwrap_or("-")),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{:<10}{value}", format!("{label}:"));
    }
    Ok(out)
}

/// Render nutrition totals.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn totals(totals: &NutritionTotals, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let value = serde_json::json!({
            "count": totals.count,
            "calories": totals.calories,
            "weight": totals.weight,
            "protein": totals.protein,
            "carbs": totals.carbs,
            "fat": totals.fat,
            "fiber": totals.fiber,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    Ok(format!(
        "Total of {} foods: {:.1} kcal, {:.1} g, protein {:.1} g, carbs {:.1} g, fat {:.1} g, fiber {:.1} g\n",
        totals.count,
        totals.calories,
        totals.weight,
        totals.protein,
        totals.carbs,
        totals.fat,
        totals.fiber
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, RecordId};

    fn sample() -> FoodRecord {
        let mut r = FoodRecord::new(RecordId::from("1700000000000"), "Apple Pie");
        r.category = Category::Snack;
        r.weight = "150".to_string();
        r.calories = "380".to_string();
        r
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Rice", 10), "Rice");
        assert_eq!(truncate("Chocolate cake", 6), "Choco…");
    }

    #[test]
    fn test_records_plain() {
        let r = sample();
        let out = records(&[&r], OutputFormat::Plain).unwrap();
        assert_eq!(out, "1700000000000  Apple Pie (snack, 150 g, 380 kcal)\n");
    }

    #[test]
    fn test_records_table_has_header() {
        let r = sample();
        let out = records(&[&r], OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("Apple Pie"));
    }

    #[test]
    fn test_records_json_is_document_format() {
        let r = sample();
        let out = records(&[&r], OutputFormat::Json).unwrap();
        let parsed: Vec<FoodRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![r]);
        assert!(out.contains("\"foodName\""));
    }

    #[test]
    fn test_records_empty() {
        assert_eq!(records(&[], OutputFormat::Plain).unwrap(), "No food records.\n");
        assert_eq!(records(&[], OutputFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn test_groups_plain() {
        let r = sample();
        let group = CategoryGroup {
            category: Category::Snack,
            color: Category::Snack.color(),
            records: vec![&r],
        };
        let out = groups(&[group], OutputFormat::Plain).unwrap();
        assert!(out.starts_with(&format!("== snack (1) [{}] ==", Category::Snack.color())));
        assert!(out.contains("Apple Pie"));
    }

    #[test]
    fn test_record_plain_shows_missing_image() {
        let out = record(&sample(), OutputFormat::Plain).unwrap();
        assert!(out.contains("Name:     Apple Pie"));
        assert!(out.contains("Image:    -"));
    }

    #[test]
    fn test_totals_plain() {
        let r = sample();
        let t = NutritionTotals::from_records([&r]);
        let out = totals(&t, OutputFormat::Plain).unwrap();
        assert!(out.starts_with("Total of 1 foods: 380.0 kcal, 150.0 g"));
    }
}
