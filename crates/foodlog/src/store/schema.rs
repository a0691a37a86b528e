//! `SQLite` schema definitions for the keyed backend.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the foods table.
///
/// `seq` keeps insertion order so a load returns records in the order they
/// were added, the same as the JSON document.
pub const CREATE_FOODS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS foods (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    food_name TEXT NOT NULL,
    category TEXT NOT NULL,
    calories TEXT NOT NULL,
    weight TEXT NOT NULL,
    protein TEXT NOT NULL,
    carbs TEXT NOT NULL,
    fat TEXT NOT NULL,
    fiber TEXT NOT NULL,
    image_uri TEXT,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_FOODS_TABLE, CREATE_METADATA_TABLE];

/// Columns selected when reading records, in `row_to_record` order.
pub const FOOD_COLUMNS: &str =
    "id, food_name, category, calories, weight, protein, carbs, fat, fiber, image_uri";
