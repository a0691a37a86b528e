//! Core record types for foodlog.
//!
//! This module defines the food record persisted by the store, the closed
//! category set it is filed under, and the identifier minted for each record.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text stored for a numeric field the user left empty.
pub const ZERO: &str = "0";

/// Last identifier handed out by [`RecordId::generate`], in milliseconds.
static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Opaque identifier of a food record.
///
/// Identifiers are derived from the creation time in milliseconds and are
/// never reused or changed once a record has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a fresh identifier from the current time.
    ///
    /// Identifiers issued by one process are strictly increasing, so two
    /// records created within the same millisecond still get distinct ids.
    #[must_use]
    pub fn generate() -> Self {
        let now = Utc::now().timestamp_millis();
        let mut last = LAST_ISSUED.load(Ordering::Relaxed);
        loop {
            let next = if now > last { now } else { last + 1 };
            match LAST_ISSUED.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return Self(next.to_string()),
                Err(current) => last = current,
            }
        }
    }

    /// Mint an identifier greater than every numeric id in `taken`.
    ///
    /// Stored ids can be ahead of the clock (a burst in an earlier run, a
    /// clock set back), so new records are numbered past them.
    #[must_use]
    pub fn generate_after<'a>(taken: impl IntoIterator<Item = &'a RecordId>) -> Self {
        if let Some(max) = taken.into_iter().filter_map(|id| id.0.parse::<i64>().ok()).max() {
            LAST_ISSUED.fetch_max(max, Ordering::SeqCst);
        }
        Self::generate()
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A category label that is not one of the known categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

/// The category a food record is filed under.
///
/// Input only ever produces the eight known categories. `Unrecognized` keeps
/// a label read back from a document written elsewhere, so it survives a
/// load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Rice, bread, noodles and other staples.
    #[default]
    Staple,
    /// Meat, eggs and fish.
    MeatEggFish,
    /// Fruit and vegetables.
    Produce,
    /// Milk, cheese, yoghurt.
    Dairy,
    /// Tofu, soy milk and other soy products.
    SoyProduct,
    /// Drinks.
    Beverage,
    /// Nuts and seeds.
    Nuts,
    /// Snacks and sweets.
    Snack,
    /// A label outside the known set.
    Unrecognized(String),
}

/// Colour used for categories outside the known set.
pub const FALLBACK_COLOR: &str = "#9E9E9E";

impl Category {
    /// The known categories, in display order.
    pub const ALL: [Category; 8] = [
        Self::Staple,
        Self::MeatEggFish,
        Self::Produce,
        Self::Dairy,
        Self::SoyProduct,
        Self::Beverage,
        Self::Nuts,
        Self::Snack,
    ];

    /// The persisted label of this category.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Staple => "staple",
            Self::MeatEggFish => "meat/egg/fish",
            Self::Produce => "produce",
            Self::Dairy => "dairy",
            Self::SoyProduct => "soy product",
            Self::Beverage => "beverage",
            Self::Nuts => "nuts",
            Self::Snack => "snack",
            Self::Unrecognized(label) => label,
        }
    }

    /// Display colour of this category as a hex RGB string.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Staple => "#F4B400",
            Self::MeatEggFish => "#DB4437",
            Self::Produce => "#0F9D58",
            Self::Dairy => "#4285F4",
            Self::SoyProduct => "#AB47BC",
            Self::Beverage => "#00ACC1",
            Self::Nuts => "#8D6E63",
            Self::Snack => "#FF7043",
            Self::Unrecognized(_) => FALLBACK_COLOR,
        }
    }

    /// Check if this is one of the known categories.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Look up a known category by its label.
    fn known(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::known(label).ok_or_else(|| UnknownCategory(label.to_string()))
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::known(&label).unwrap_or(Self::Unrecognized(label))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unrecognized(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// A logged food item.
///
/// Nutrition values are kept as the text the user entered; an empty entry
/// is stored as `"0"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// Identifier assigned when the record was first saved.
    pub id: RecordId,
    /// Name of the food, trimmed and non-empty.
    pub food_name: String,
    /// Category the food is filed under.
    #[serde(default)]
    pub category: Category,
    /// Energy in kcal.
    #[serde(default = "zero")]
    pub calories: String,
    /// Portion weight in grams.
    #[serde(default = "zero")]
    pub weight: String,
    /// Protein in grams.
    #[serde(default = "zero")]
    pub protein: String,
    /// Carbohydrates in grams.
    #[serde(default = "zero")]
    pub carbs: String,
    /// Fat in grams.
    #[serde(default = "zero")]
    pub fat: String,
    /// Dietary fibre in grams.
    #[serde(default = "zero")]
    pub fiber: String,
    /// Location of the record's photo, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

fn zero() -> String {
    ZERO.to_string()
}

impl FoodRecord {
    /// Create a record with the given name and every other field defaulted.
    #[must_use]
    pub fn new(id: RecordId, food_name: impl Into<String>) -> Self {
        Self {
            id,
            food_name: food_name.into(),
            category: Category::default(),
            calories: zero(),
            weight: zero(),
            protein: zero(),
            carbs: zero(),
            fat: zero(),
            fiber: zero(),
            image_uri: None,
        }
    }

    /// The record's image as a filesystem path.
    #[must_use]
    pub fn image_path(&self) -> Option<&Path> {
        self.image_uri.as_deref().map(Path::new)
    }

    /// Check if the record's name contains `query`, ignoring case.
    #[must_use]
    pub fn name_contains(&self, query: &str) -> bool {
        query.is_empty() || self.food_name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Parse a numeric text field. Returns `None` unless it is a finite number.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Summed nutrition values over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    /// Number of records summed.
    pub count: usize,
    /// Total energy in kcal.
    pub calories: f64,
    /// Total weight in grams.
    pub weight: f64,
    /// Total protein in grams.
    pub protein: f64,
    /// Total carbohydrates in grams.
    pub carbs: f64,
    /// Total fat in grams.
    pub fat: f64,
    /// Total fibre in grams.
    pub fiber: f64,
}

impl NutritionTotals {
    /// Sum the nutrition values of `records`. Unparsable values count as zero.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FoodRecord>) -> Self {
        let value = |text: &str| parse_number(text).unwrap_or(0.0);
        records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.count += 1;
            acc.calories += value(&r.calories);
            acc.weight += value(&r.weight);
            acc.protein += value(&r.protein);
            acc.carbs += value(&r.carbs);
            acc.fat += value(&r.fat);
            acc.fiber += value(&r.fiber);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FoodRecord {
        FoodRecord::new(RecordId::generate(), name)
    }

    #[test]
    fn test_generate_is_strictly_increasing() {
        let ids: Vec<i64> = (0..100)
            .map(|_| RecordId::generate().as_str().parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_generate_is_timestamp_derived() {
        let before = Utc::now().timestamp_millis();
        let id: i64 = RecordId::generate().as_str().parse().unwrap();
        assert!(id >= before);
    }

    #[test]
    fn test_generate_after_skips_ids_ahead_of_clock() {
        let now = Utc::now().timestamp_millis();
        let taken: Vec<RecordId> = (now..now + 3000)
            .step_by(7)
            .map(|n| RecordId::from(n.to_string()))
            .chain([RecordId::from("not-a-number")])
            .collect();

        let highest: i64 = taken[taken.len() - 2].as_str().parse().unwrap();

        let id: i64 = RecordId::generate_after(&taken).as_str().parse().unwrap();
        assert!(id > highest);
    }

    #[test]
    fn test_category_labels_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.label().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_default_is_first_label() {
        assert_eq!(Category::default(), Category::ALL[0]);
        assert_eq!(Category::default().label(), "staple");
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        let err = "dessert".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("dessert".to_string()));
    }

    #[test]
    fn test_category_parse_trims() {
        assert_eq!(" dairy ".parse::<Category>().unwrap(), Category::Dairy);
    }

    #[test]
    fn test_category_colors() {
        for category in Category::ALL {
            assert_ne!(category.color(), FALLBACK_COLOR);
        }
        let other = Category::Unrecognized("dessert".to_string());
        assert_eq!(other.color(), FALLBACK_COLOR);
        assert!(!other.is_known());
    }

    #[test]
    fn test_unrecognized_category_survives_serde() {
        let json = r#"{"id":"1","foodName":"Flan","category":"dessert"}"#;
        let record: FoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, Category::Unrecognized("dessert".to_string()));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["category"], "dessert");
    }

    #[test]
    fn test_record_field_names() {
        let mut r = FoodRecord::new(RecordId::from("7"), "Tofu");
        r.category = Category::SoyProduct;
        r.image_uri = Some("/data/images/7_1.jpg".to_string());

        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["foodName"], "Tofu");
        assert_eq!(value["category"], "soy product");
        assert_eq!(value["weight"], "0");
        assert_eq!(value["imageUri"], "/data/images/7_1.jpg");
    }

    #[test]
    fn test_record_without_image_omits_field() {
        let value = serde_json::to_value(record("Rice")).unwrap();
        assert!(value.get("imageUri").is_none());
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let json = r#"{"id":"1","foodName":"Tea","category":"beverage"}"#;
        let r: FoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.calories, "0");
        assert_eq!(r.fiber, "0");
        assert!(r.image_uri.is_none());
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let r = record("Apple Pie");
        assert!(r.name_contains("pp"));
        assert!(r.name_contains("APPLE"));
        assert!(r.name_contains(""));
        assert!(!r.name_contains("banana"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("100"), Some(100.0));
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_nutrition_totals() {
        let mut a = record("Egg");
        a.calories = "78".to_string();
        a.protein = "6.3".to_string();
        let mut b = record("Toast");
        b.calories = "80".to_string();
        b.protein = "oops".to_string();

        let totals = NutritionTotals::from_records([&a, &b]);
        assert_eq!(totals.count, 2);
        assert!((totals.calories - 158.0).abs() < f64::EPSILON);
        assert!((totals.protein - 6.3).abs() < 1e-9);
    }

    #[test]
    fn test_image_path() {
        let mut r = record("Soup");
        assert!(r.image_path().is_none());
        r.image_uri = Some("/tmp/soup.png".to_string());
        assert_eq!(r.image_path(), Some(Path::new("/tmp/soup.png")));
    }
}
