//! In-process checkpoint store for tests and dry runs.

use super::{AdvanceOutcome, CheckpointStore};
use crate::error::CheckpointError;
use crate::models::{CheckpointRecord, Cursor};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

/// Mutex-guarded checkpoint record with the same contract as the
/// PostgreSQL store. The comparison and the write happen under one lock.
#[derive(Debug)]
pub struct InMemoryCheckpointStore {
    record_key: String,
    record: Mutex<Option<CheckpointRecord>>,
}

impl Default for InMemoryCheckpointStore {
    fn default() -> Self {
        Self::new(crate::constants::checkpoint::DEFAULT_RECORD_KEY)
    }
}

impl InMemoryCheckpointStore {
    pub fn new(record_key: impl Into<String>) -> Self {
        Self {
            record_key: record_key.into(),
            record: Mutex::new(None),
        }
    }

    /// Store pre-seeded with an existing checkpoint
    pub fn with_cursor(cursor: Cursor) -> Self {
        let store = Self::default();
        *store.record.lock() = Some(CheckpointRecord::new(store.record_key.clone(), cursor));
        store
    }

    /// Snapshot of the stored record (for testing)
    pub fn record(&self) -> Option<CheckpointRecord> {
        self.record.lock().clone()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn read(&self) -> Result<Option<Cursor>, CheckpointError> {
        Ok(self.record.lock().as_ref().map(|record| record.cursor))
    }

    async fn advance(&self, cursor: Cursor) -> Result<AdvanceOutcome, CheckpointError> {
        let mut record = self.record.lock();
        let stored = record.as_ref().map(|current| current.cursor);
        if let Some(stored) = stored.filter(|stored| *stored >= cursor) {
            debug!(stored = %stored, requested = %cursor, "Checkpoint already at or past cursor");
            return Ok(AdvanceOutcome::Unchanged);
        }

        *record = Some(CheckpointRecord::new(self.record_key.clone(), cursor));
        Ok(AdvanceOutcome::Advanced)
    }
}
