//! Single-document JSON backend.
//!
//! The whole collection lives in one JSON array. Reads and writes always
//! cover the entire document; writes go through a temp file and a rename so
//! a failed write never leaves a truncated document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::RecordStore;
use crate::error::{Error, Result};
use crate::record::FoodRecord;

/// Food records stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path to the document.
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`.
    ///
    /// Nothing is touched on disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the containing directory if it does not exist.
    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Path of the scratch file a write goes through.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "foods.json".into(), |n| n.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!("{name}.tmp.{}", std::process::id()))
    }

    /// Serialize `records` and swap them in for the current document.
    async fn write_document(&self, records: &[FoodRecord]) -> Result<()> {
        self.ensure_parent().await?;

        let json = serde_json::to_vec_pretty(records)?;
        let temp_path = self.temp_path();
        let to_write_error = |source| Error::DocumentWrite {
            path: self.path.clone(),
            source,
        };

        let written: std::io::Result<()> = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&json).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(source) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(to_write_error(source));
        }

        debug!(
            "Wrote {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Move an unparsable document out of the way so the next save does not
    /// overwrite it.
    async fn set_aside(&self) {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "foods.json".into(), |n| n.to_string_lossy().into_owned());
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        let aside = self.path.with_file_name(format!("{name}.corrupt-{stamp}"));
        match fs::rename(&self.path, &aside).await {
            Ok(()) => warn!("Moved unreadable document to {}", aside.display()),
            Err(e) => warn!(
                "Could not move unreadable document {} aside: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn load(&self) -> Vec<FoodRecord> {
        if let Err(e) = self.ensure_parent().await {
            warn!("Reading food records failed: {}", e);
            return Vec::new();
        }

        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Creating empty food log at {}", self.path.display());
                if let Err(e) = self.write_document(&[]).await {
                    warn!("Could not create {}: {}", self.path.display(), e);
                }
                return Vec::new();
            }
            Err(e) => {
                warn!("Reading {} failed: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }

        match serde_json::from_slice::<Vec<FoodRecord>>(&bytes) {
            Ok(records) => {
                debug!(
                    "Loaded {} records from {}",
                    records.len(),
                    self.path.display()
                );
                records
            }
            Err(e) => {
                warn!("Parsing {} failed: {}", self.path.display(), e);
                self.set_aside().await;
                Vec::new()
            }
        }
    }

    async fn save(&self, records: &[FoodRecord]) -> Result<()> {
        self.write_document(records).await
    }
}
