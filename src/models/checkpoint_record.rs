use super::Cursor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single durable checkpoint row: `{id, cursor}` plus the time of the
/// last successful advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub id: String,
    pub cursor: Cursor,
    pub updated_at: DateTime<Utc>,
}

impl CheckpointRecord {
    pub fn new(id: impl Into<String>, cursor: Cursor) -> Self {
        Self {
            id: id.into(),
            cursor,
            updated_at: Utc::now(),
        }
    }
}
