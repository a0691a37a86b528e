//! Keyed `SQLite` backend.
//!
//! Each record is a row keyed by its id, so inserting, editing or deleting
//! one record touches only that row. Whole-collection saves still work and
//! run inside a single transaction.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::migrations;
use super::schema::FOOD_COLUMNS;
use super::RecordStore;
use crate::error::{Error, Result};
use crate::record::{Category, FoodRecord, RecordId};

/// Food records stored one row per record in `SQLite`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection, shared with blocking tasks.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| Error::internal("database connection lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| Error::internal(format!("database task failed: {e}")))?
    }

    fn select_all(conn: &Connection) -> Result<Vec<FoodRecord>> {
        let mut stmt = conn.prepare(&format!("SELECT {FOOD_COLUMNS} FROM foods ORDER BY seq ASC"))?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn select_one(conn: &Connection, id: &RecordId) -> Result<Option<FoodRecord>> {
        let record = conn
            .query_row(
                &format!("SELECT {FOOD_COLUMNS} FROM foods WHERE id = ?1"),
                [id.as_str()],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn insert_row(conn: &Connection, record: &FoodRecord) -> Result<()> {
        conn.execute(
            r"
            INSERT INTO foods (id, food_name, category, calories, weight, protein, carbs, fat, fiber, image_uri)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
            params![
                record.id.as_str(),
                record.food_name,
                record.category.label(),
                record.calories,
                record.weight,
                record.protein,
                record.carbs,
                record.fat,
                record.fiber,
                record.image_uri,
            ],
        )?;
        Ok(())
    }

    /// Convert a database row to a `FoodRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FoodRecord> {
        let id: String = row.get(0)?;
        let category: String = row.get(2)?;
        Ok(FoodRecord {
            id: RecordId::from(id),
            food_name: row.get(1)?,
            category: Category::from(category),
            calories: row.get(3)?,
            weight: row.get(4)?,
            protein: row.get(5)?,
            carbs: row.get(6)?,
            fat: row.get(7)?,
            fiber: row.get(8)?,
            image_uri: row.get(9)?,
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self) -> Vec<FoodRecord> {
        match self.with_conn(|conn| Self::select_all(conn)).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Reading food records from {} failed: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    async fn save(&self, records: &[FoodRecord]) -> Result<()> {
        let records = records.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM foods", [])?;
            for record in &records {
                Self::insert_row(&tx, record)?;
            }
            tx.commit()?;
            debug!("Replaced collection with {} records", records.len());
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &RecordId) -> Option<FoodRecord> {
        let id = id.clone();
        match self.with_conn(move |conn| Self::select_one(conn, &id)).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Reading food record failed: {}", e);
                None
            }
        }
    }

    async fn insert(&self, record: FoodRecord) -> Result<()> {
        self.with_conn(move |conn| {
            if Self::select_one(conn, &record.id)?.is_some() {
                return Err(Error::DuplicateId { id: record.id });
            }
            Self::insert_row(conn, &record)?;
            debug!("Inserted food record {}", record.id);
            Ok(())
        })
        .await
    }

    async fn replace(&self, record: FoodRecord) -> Result<FoodRecord> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let previous =
                Self::select_one(&tx, &record.id)?.ok_or_else(|| Error::not_found(&record.id))?;
            tx.execute(
                r"
                UPDATE foods
                SET food_name = ?2, category = ?3, calories = ?4, weight = ?5, protein = ?6,
                    carbs = ?7, fat = ?8, fiber = ?9, image_uri = ?10, updated_at = datetime('now')
                WHERE id = ?1
                ",
                params![
                    record.id.as_str(),
                    record.food_name,
                    record.category.label(),
                    record.calories,
                    record.weight,
                    record.protein,
                    record.carbs,
                    record.fat,
                    record.fiber,
                    record.image_uri,
                ],
            )?;
            tx.commit()?;
            debug!("Updated food record {}", record.id);
            Ok(previous)
        })
        .await
    }

    async fn remove(&self, id: &RecordId) -> Result<Option<FoodRecord>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let Some(previous) = Self::select_one(&tx, &id)? else {
                return Ok(None);
            };
            tx.execute("DELETE FROM foods WHERE id = ?1", [id.as_str()])?;
            tx.commit()?;
            debug!("Deleted food record {}", id);
            Ok(Some(previous))
        })
        .await
    }
}
