//! PostgreSQL-backed checkpoint store.
//!
//! The conditional advance is one `INSERT ... ON CONFLICT DO UPDATE ...
//! WHERE` statement, so the existence check, the comparison and the write
//! are evaluated atomically by the server. Zero affected rows means the
//! stored cursor was already at or past the requested one.

use super::{AdvanceOutcome, CheckpointStore};
use crate::constants::identifiers::is_valid_identifier;
use crate::error::CheckpointError;
use crate::models::Cursor;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct PgCheckpointStore {
    pool: PgPool,
    table_name: String,
    record_key: String,
}

impl std::fmt::Debug for PgCheckpointStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCheckpointStore")
            .field("table_name", &self.table_name)
            .field("record_key", &self.record_key)
            .finish()
    }
}

impl PgCheckpointStore {
    /// Create a store over `table_name`, which must be a plain identifier
    /// since it is interpolated into SQL.
    pub fn new(
        pool: PgPool,
        table_name: impl Into<String>,
        record_key: impl Into<String>,
    ) -> Result<Self, CheckpointError> {
        let table_name = table_name.into();
        if !is_valid_identifier(&table_name) {
            return Err(CheckpointError::InvalidTableName {
                table: table_name,
                reason: "must start with a letter or underscore and contain only [A-Za-z0-9_]"
                    .to_string(),
            });
        }

        Ok(Self {
            pool,
            table_name,
            record_key: record_key.into(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Create the checkpoint table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), CheckpointError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                since_id BIGINT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            self.table_name
        );

        sqlx::query(&ddl).execute(&self.pool).await?;

        info!(table = %self.table_name, "Checkpoint table ready");
        Ok(())
    }

    fn advance_sql(&self) -> String {
        format!(
            "INSERT INTO {table} (id, since_id, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (id) DO UPDATE
                SET since_id = EXCLUDED.since_id, updated_at = EXCLUDED.updated_at
                WHERE {table}.since_id < EXCLUDED.since_id",
            table = self.table_name
        )
    }
}

#[async_trait]
impl CheckpointStore for PgCheckpointStore {
    #[instrument(skip(self), fields(table = %self.table_name, key = %self.record_key))]
    async fn read(&self) -> Result<Option<Cursor>, CheckpointError> {
        let sql = format!("SELECT since_id FROM {} WHERE id = $1", self.table_name);

        let row = sqlx::query(&sql)
            .bind(&self.record_key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let since_id: i64 = row.try_get("since_id").map_err(|e| {
                    CheckpointError::malformed_record(self.record_key.clone(), e.to_string())
                })?;
                debug!(cursor = since_id, "Checkpoint read");
                Ok(Some(Cursor::new(since_id)))
            }
            None => {
                debug!("No checkpoint recorded yet");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, cursor), fields(table = %self.table_name, key = %self.record_key, cursor = %cursor))]
    async fn advance(&self, cursor: Cursor) -> Result<AdvanceOutcome, CheckpointError> {
        let result = sqlx::query(&self.advance_sql())
            .bind(&self.record_key)
            .bind(cursor.value())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Checkpoint already at or past cursor, skipping write");
            return Ok(AdvanceOutcome::Unchanged);
        }

        debug!("Checkpoint advanced");
        Ok(AdvanceOutcome::Advanced)
    }
}
