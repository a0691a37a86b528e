//! In-memory backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::record::FoodRecord;

/// Records held in memory. Used as a stand-in for the real stores in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<FoodRecord>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: Vec<FoodRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Make every following save fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Vec<FoodRecord> {
        self.records.read().await.clone()
    }

    async fn save(&self, records: &[FoodRecord]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other("simulated write failure")));
        }
        *self.records.write().await = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
