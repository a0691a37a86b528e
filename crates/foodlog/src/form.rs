//! Form fields and validation.
//!
//! A [`FoodForm`] holds the raw text a user typed. [`FoodForm::validate`]
//! turns it into a [`ValidatedFood`] or explains why it cannot be saved.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::record::{parse_number, Category, FoodRecord, RecordId, ZERO};

/// Reasons a form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The food name is empty after trimming.
    #[error("please enter a food name")]
    EmptyName,

    /// The weight is missing or not a number.
    #[error("weight must be a number, got '{value}'")]
    InvalidWeight {
        /// What was entered.
        value: String,
    },

    /// The category is not one of the known labels.
    #[error("unknown category '{label}'")]
    UnknownCategory {
        /// What was entered.
        label: String,
    },
}

/// Raw field values collected from the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodForm {
    /// Id of the record being edited; `None` when creating.
    pub editing: Option<RecordId>,
    /// Food name as typed.
    pub food_name: String,
    /// Category label; empty means the default category.
    pub category: String,
    /// Energy in kcal.
    pub calories: String,
    /// Portion weight in grams.
    pub weight: String,
    /// Protein in grams.
    pub protein: String,
    /// Carbohydrates in grams.
    pub carbs: String,
    /// Fat in grams.
    pub fat: String,
    /// Fibre in grams.
    pub fiber: String,
    /// Picked image, or the record's current image when editing.
    pub image: Option<PathBuf>,
}

/// Form values that passed validation, ready to become a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFood {
    /// Id of the record being edited; `None` when creating.
    pub editing: Option<RecordId>,
    /// Trimmed, non-empty name.
    pub food_name: String,
    /// One of the known categories.
    pub category: Category,
    /// Energy in kcal.
    pub calories: String,
    /// Portion weight in grams, known to be numeric.
    pub weight: String,
    /// Protein in grams.
    pub protein: String,
    /// Carbohydrates in grams.
    pub carbs: String,
    /// Fat in grams.
    pub fat: String,
    /// Fibre in grams.
    pub fiber: String,
    /// Image to attach.
    pub image: Option<PathBuf>,
}

impl FoodForm {
    /// An empty form for a new record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from an existing record, in edit mode.
    #[must_use]
    pub fn from_record(record: &FoodRecord) -> Self {
        Self {
            editing: Some(record.id.clone()),
            food_name: record.food_name.clone(),
            category: record.category.label().to_string(),
            calories: record.calories.clone(),
            weight: record.weight.clone(),
            protein: record.protein.clone(),
            carbs: record.carbs.clone(),
            fat: record.fat.clone(),
            fiber: record.fiber.clone(),
            image: record.image_path().map(PathBuf::from),
        }
    }

    /// A form in edit mode built from a record serialized as JSON, the way
    /// it is handed over when navigating into the edit screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is not a serialized food record.
    pub fn from_route_param(param: &str) -> Result<Self> {
        let record: FoodRecord = serde_json::from_str(param)?;
        Ok(Self::from_record(&record))
    }

    /// Check if this form edits an existing record.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Validate the fields.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] if the name is empty, the weight is not a
    /// number, or the category is unknown.
    pub fn validate(&self) -> std::result::Result<ValidatedFood, FormError> {
        let food_name = self.food_name.trim();
        if food_name.is_empty() {
            return Err(FormError::EmptyName);
        }

        let weight = self.weight.trim();
        if parse_number(weight).is_none() {
            return Err(FormError::InvalidWeight {
                value: weight.to_string(),
            });
        }

        let category = if self.category.trim().is_empty() {
            Category::default()
        } else {
            self.category
                .parse::<Category>()
                .map_err(|e| FormError::UnknownCategory { label: e.0 })?
        };

        Ok(ValidatedFood {
            editing: self.editing.clone(),
            food_name: food_name.to_string(),
            category,
            calories: or_zero(&self.calories),
            weight: weight.to_string(),
            protein: or_zero(&self.protein),
            carbs: or_zero(&self.carbs),
            fat: or_zero(&self.fat),
            fiber: or_zero(&self.fiber),
            image: self.image.clone(),
        })
    }
}

impl ValidatedFood {
    /// Build the record under `id`, with `image_uri` as its image.
    #[must_use]
    pub fn into_record(self, id: RecordId, image_uri: Option<String>) -> FoodRecord {
        FoodRecord {
            id,
            food_name: self.food_name,
            category: self.category,
            calories: self.calories,
            weight: self.weight,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            image_uri,
        }
    }
}

fn or_zero(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        ZERO.to_string()
    } else {
        text.to_string()
    }
}
