//! Shared application state.
//!
//! [`AppState`] bundles what every screen needs: the configuration, the
//! record store, the private image directory and the write lock that keeps
//! mutations from one process in a single queue. Clone it freely; clones
//! share everything.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::images::ImageStore;
use crate::store::{self, RecordStore};

/// Handles shared by the form controllers and list views of one process.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Where records are persisted.
    pub store: Arc<dyn RecordStore>,
    /// Where picked images are copied.
    pub images: ImageStore,
    /// Held for the duration of every read-modify-write of the collection.
    pub(crate) write_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Open the configured store and image directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn init(config: Config) -> Result<Self> {
        let store = store::open_store(&config)?;
        let images = ImageStore::new(config.images_dir());
        Ok(Self::from_parts(Arc::new(config), store, images))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(config: Arc<Config>, store: Arc<dyn RecordStore>, images: ImageStore) -> Self {
        Self {
            config,
            store,
            images,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State backed by `store` under default configuration, with images kept
    /// under `images_dir`.
    #[must_use]
    pub fn with_store(
        store: Arc<dyn RecordStore>,
        images_dir: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self::from_parts(Arc::new(Config::default()), store, ImageStore::new(images_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Backend, MemoryStore, SqliteStore};

    #[test]
    fn test_init_uses_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config.storage.backend = Backend::Sqlite;

        let state = AppState::init(config).unwrap();
        assert_eq!(state.store.name(), "sqlite");
        assert_eq!(state.images.dir(), dir.path().join("images"));
    }

    #[test]
    fn test_clones_share_write_lock() {
        let state = AppState::with_store(Arc::new(MemoryStore::new()), "/tmp/images");
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.write_lock, &clone.write_lock));
        assert!(Arc::ptr_eq(&state.store, &clone.store));
    }

    #[test]
    fn test_with_store_accepts_any_backend() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let state = AppState::with_store(store, "/tmp/images");
        assert_eq!(state.store.name(), "sqlite");
        assert_eq!(state.images.dir(), std::path::Path::new("/tmp/images"));
    }
}
