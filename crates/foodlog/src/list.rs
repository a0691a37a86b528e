//! List and search view over the stored records.
//!
//! The view keeps no cache between visits: every [`ListView::on_focus`]
//! reads the whole collection again, so changes made by a form are visible
//! as soon as the list is shown.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::record::{Category, FoodRecord, NutritionTotals};
use crate::state::AppState;
use crate::store::RecordStore;

/// Whether the view is reading the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Showing the last loaded collection.
    #[default]
    Idle,
    /// A reload is in progress.
    Loading,
}

/// Visible records sharing a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    /// The shared category.
    pub category: Category,
    /// Display colour of the category.
    pub color: &'static str,
    /// Records in collection order.
    pub records: Vec<&'a FoodRecord>,
}

/// Records whose name contains `query`, ignoring case, in their original order.
///
/// An empty query matches every record.
pub fn filter_by_name<'a>(records: &'a [FoodRecord], query: &str) -> Vec<&'a FoodRecord> {
    records.iter().filter(|r| r.name_contains(query)).collect()
}

/// The food list screen.
#[derive(Debug)]
pub struct ListView {
    store: Arc<dyn RecordStore>,
    records: Vec<FoodRecord>,
    search: String,
    state: ViewState,
}

impl ListView {
    /// An empty view reading from the state's store.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            records: Vec::new(),
            search: String::new(),
            state: ViewState::Idle,
        }
    }

    /// Reload the collection. Called every time the screen gains focus.
    ///
    /// Returns the number of records loaded.
    pub async fn on_focus(&mut self) -> usize {
        self.state = ViewState::Loading;
        self.records = self.store.load().await;
        self.state = ViewState::Idle;
        debug!("Loaded {} food records from {}", self.records.len(), self.store.name());
        self.records.len()
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Set the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Every loaded record, ignoring the search.
    #[must_use]
    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    /// Loaded records matching the search text.
    #[must_use]
    pub fn visible(&self) -> Vec<&FoodRecord> {
        filter_by_name(&self.records, &self.search)
    }

    /// Visible records grouped by category.
    ///
    /// Known categories come first in their usual order, then labels outside
    /// the known set in alphabetical order. Empty groups are left out.
    #[must_use]
    pub fn grouped(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: BTreeMap<&Category, Vec<&FoodRecord>> = BTreeMap::new();
        for record in self.visible() {
            groups.entry(&record.category).or_default().push(record);
        }
        groups
            .into_iter()
            .map(|(category, records)| CategoryGroup {
                category: category.clone(),
                color: category.color(),
                records,
            })
            .collect()
    }

    /// Nutrition totals of the visible records.
    #[must_use]
    pub fn totals(&self) -> NutritionTotals {
        NutritionTotals::from_records(self.visible())
    }
}
