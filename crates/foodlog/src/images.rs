//! Private image storage.
//!
//! Picked images are copied into a directory owned by the application so a
//! record keeps its photo even after the original file is moved or deleted.
//! Copies are named `<record id>_<millis>.<ext>`, with a `-<n>` suffix when
//! that name is taken; the only reference to a copy is the owning record's
//! `imageUri`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::RecordId;

/// Extension used when the picked file has none.
const DEFAULT_EXTENSION: &str = "jpg";

/// Suffixed names tried before an import gives up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// The application's private image directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `dir`. The directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the image directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check if `path` is a copy held in this directory.
    #[must_use]
    pub fn owns(&self, path: &Path) -> bool {
        path.parent() == Some(self.dir.as_path())
    }

    /// File name for copy number `attempt` of `source` belonging to record
    /// `id`, taken at `millis`.
    fn file_name_for(source: &Path, id: &RecordId, millis: i64, attempt: u32) -> String {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_ascii_lowercase);
        if attempt == 0 {
            format!("{id}_{millis}.{ext}")
        } else {
            format!("{id}_{millis}-{attempt}.{ext}")
        }
    }

    /// Create an empty file under a name no other copy holds.
    async fn reserve(&self, source: &Path, id: &RecordId) -> Result<PathBuf> {
        let millis = Utc::now().timestamp_millis();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let dest = self.dir.join(Self::file_name_for(source, id, millis, attempt));
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&dest)
                .await
            {
                Ok(_) => return Ok(dest),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => {
                    return Err(Error::ImageCopy {
                        from: source.to_path_buf(),
                        to: dest,
                        source: e,
                    })
                }
            }
        }
        Err(Error::ImageCopy {
            from: source.to_path_buf(),
            to: self.dir.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "no free image file name",
            ),
        })
    }

    /// Copy a picked image into the directory and return the copy's path.
    ///
    /// Every import gets a file of its own, even when the same record
    /// imports twice within a millisecond.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the copy fails.
    pub async fn import(&self, source: &Path, id: &RecordId) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: self.dir.clone(),
                source,
            })?;

        let dest = self.reserve(source, id).await?;
        if let Err(e) = fs::copy(source, &dest).await {
            let _ = fs::remove_file(&dest).await;
            return Err(Error::ImageCopy {
                from: source.to_path_buf(),
                to: dest,
                source: e,
            });
        }

        info!("Copied image {} to {}", source.display(), dest.display());
        Ok(dest)
    }

    /// Delete a copy held in this directory.
    ///
    /// Paths outside the directory are left alone. Failures are logged, not
    /// returned: a stray image file does no harm.
    pub async fn discard(&self, path: &Path) {
        if !self.owns(path) {
            debug!("Not discarding {}: outside image directory", path.display());
            return;
        }
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed image {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove image {}: {}", path.display(), e),
        }
    }
}
