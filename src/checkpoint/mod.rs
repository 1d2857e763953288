//! # Checkpoint Store
//!
//! Durable single-record cursor storage with monotonic advance.
//!
//! The store holds one record keyed by a fixed identifier. Readers see the
//! stored cursor or an explicit absence; writers go through
//! [`CheckpointStore::advance`], which is a single atomic compare-and-advance:
//! the write lands only when no record exists or the stored cursor is strictly
//! lower than the new one. A losing write is reported as
//! [`AdvanceOutcome::Unchanged`], never as an error, so retried or overlapping
//! poll cycles can never move the cursor backward.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryCheckpointStore;
pub use postgres::PgCheckpointStore;

use crate::error::CheckpointError;
use crate::models::Cursor;
use async_trait::async_trait;

/// Result of a conditional checkpoint write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The record was created or moved forward
    Advanced,
    /// The stored cursor was already at or past the requested value
    Unchanged,
}

impl AdvanceOutcome {
    pub fn is_advanced(self) -> bool {
        matches!(self, AdvanceOutcome::Advanced)
    }
}

#[async_trait]
pub trait CheckpointStore: Send + Sync + 'static {
    /// Current cursor, or `None` if no checkpoint has been recorded yet.
    async fn read(&self) -> Result<Option<Cursor>, CheckpointError>;

    /// Atomically store `cursor` if no record exists or the stored cursor is
    /// strictly less than it.
    ///
    /// Implementations must perform the check and the write as one atomic
    /// operation. Any failure other than the losing comparison is an error.
    async fn advance(&self, cursor: Cursor) -> Result<AdvanceOutcome, CheckpointError>;
}
