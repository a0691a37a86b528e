//! Record storage for foodlog.
//!
//! Every backend implements [`RecordStore`], a whole-collection `load`/`save`
//! contract. The per-record operations have default implementations built on
//! that contract (read everything, change one record, write everything);
//! backends that address records individually override them.
//!
//! Backends:
//! - [`JsonFileStore`]: the collection as a single JSON array on disk
//! - [`SqliteStore`]: one row per record keyed by id
//! - [`MemoryStore`]: in-memory, for tests

pub mod json;
pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{FoodRecord, RecordId};

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Which backend holds the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A single JSON document.
    #[default]
    Json,
    /// A `SQLite` database with one row per record.
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Persistent collection of food records.
///
/// `load` never fails: an unreadable or missing collection is logged and
/// read as empty. Writes report their failures.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Short name of the backend, for logs and status output.
    fn name(&self) -> &'static str;

    /// Read the whole collection, in stored order.
    async fn load(&self) -> Vec<FoodRecord>;

    /// Overwrite the whole collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written. The
    /// previously stored collection is left as it was.
    async fn save(&self, records: &[FoodRecord]) -> Result<()>;

    /// Find a record by id.
    async fn get(&self, id: &RecordId) -> Option<FoodRecord> {
        self.load().await.into_iter().find(|r| &r.id == id)
    }

    /// Append a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if the id is taken, or the write error.
    async fn insert(&self, record: FoodRecord) -> Result<()> {
        let mut records = self.load().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::DuplicateId { id: record.id });
        }
        records.push(record);
        self.save(&records).await
    }

    /// Overwrite the record that has the same id, returning the old version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has the id, or the
    /// write error.
    async fn replace(&self, record: FoodRecord) -> Result<FoodRecord> {
        let mut records = self.load().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| Error::not_found(&record.id))?;
        let previous = std::mem::replace(slot, record);
        self.save(&records).await?;
        Ok(previous)
    }

    /// Remove the record with the given id, returning it.
    ///
    /// Returns `None` without writing anything if no record has the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written.
    async fn remove(&self, id: &RecordId) -> Result<Option<FoodRecord>> {
        let mut records = self.load().await;
        let Some(index) = records.iter().position(|r| &r.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.save(&records).await?;
        Ok(Some(removed))
    }
}

/// Open the backend selected by the configuration.
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.storage.backend {
        Backend::Json => Arc::new(JsonFileStore::new(config.document_path())),
        Backend::Sqlite => Arc::new(SqliteStore::open(config.database_path())?),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    fn record(id: &str, name: &str) -> FoodRecord {
        FoodRecord::new(RecordId::from(id), name)
    }

    #[tokio::test]
    async fn test_default_insert_appends() {
        let store = MemoryStore::new();
        store.insert(record("1", "Rice")).await.unwrap();
        store.insert(record("2", "Egg")).await.unwrap();

        let all = store.load().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].food_name, "Egg");
    }

    #[tokio::test]
    async fn test_default_insert_rejects_duplicate() {
        let store = MemoryStore::with_records(vec![record("1", "Rice")]);
        let err = store.insert(record("1", "Other")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateId { .. }));
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_default_replace_keeps_position() {
        let store =
            MemoryStore::with_records(vec![record("1", "Rice"), record("2", "Egg"), record("3", "Tea")]);
        let mut edited = record("2", "Boiled egg");
        edited.category = Category::MeatEggFish;

        let previous = store.replace(edited.clone()).await.unwrap();
        assert_eq!(previous.food_name, "Egg");

        let all = store.load().await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], edited);
    }

    #[tokio::test]
    async fn test_default_replace_missing() {
        let store = MemoryStore::new();
        let err = store.replace(record("9", "Ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_default_remove() {
        let store = MemoryStore::with_records(vec![record("1", "Rice"), record("2", "Egg")]);
        let removed = store.remove(&RecordId::from("1")).await.unwrap();
        assert_eq!(removed.unwrap().food_name, "Rice");
        assert_eq!(store.load().await.len(), 1);

        let saves = store.save_count();
        assert!(store.remove(&RecordId::from("1")).await.unwrap().is_none());
        assert_eq!(store.save_count(), saves);
    }

    #[tokio::test]
    async fn test_default_get() {
        let store = MemoryStore::with_records(vec![record("1", "Rice")]);
        assert!(store.get(&RecordId::from("1")).await.is_some());
        assert!(store.get(&RecordId::from("2")).await.is_none());
    }

    #[test]
    fn test_backend_display_and_default() {
        assert_eq!(Backend::default(), Backend::Json);
        assert_eq!(Backend::Json.to_string(), "json");
        assert_eq!(Backend::Sqlite.to_string(), "sqlite");
    }

    #[test]
    fn test_open_store_selects_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());

        assert_eq!(open_store(&config).unwrap().name(), "json");

        config.storage.backend = Backend::Sqlite;
        assert_eq!(open_store(&config).unwrap().name(), "sqlite");
    }
}
