//! PGMQ-backed dispatcher.
//!
//! Each batch becomes one queue message whose body is the JSON array of
//! items, exactly as harvested. Downstream workers read the queue at their
//! own pace, so submission returns as soon as PostgreSQL accepts the send.

use super::{DispatchReceipt, Dispatcher};
use crate::constants::identifiers::is_valid_identifier;
use crate::error::DispatchError;
use crate::models::Item;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct PgmqDispatcher {
    pool: PgPool,
    queue_name: String,
}

impl std::fmt::Debug for PgmqDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgmqDispatcher")
            .field("queue_name", &self.queue_name)
            .finish()
    }
}

impl PgmqDispatcher {
    pub fn new(pool: PgPool, queue_name: impl Into<String>) -> Result<Self, DispatchError> {
        let queue_name = queue_name.into();
        if !is_valid_identifier(&queue_name) {
            return Err(DispatchError::InvalidTarget {
                target: queue_name,
                reason: "PGMQ queue names must be plain SQL identifiers".to_string(),
            });
        }
        Ok(Self { pool, queue_name })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Create the queue if it doesn't exist (idempotent in PGMQ)
    #[instrument(skip(self), fields(queue = %self.queue_name))]
    pub async fn ensure_queue(&self) -> Result<(), DispatchError> {
        sqlx::query("SELECT pgmq.create($1)")
            .bind(&self.queue_name)
            .execute(&self.pool)
            .await
            .map_err(|e| self.map_sqlx_error(e))?;

        info!("Dispatch queue ready");
        Ok(())
    }

    fn map_sqlx_error(&self, err: sqlx::Error) -> DispatchError {
        match err {
            sqlx::Error::Database(db_err) => {
                DispatchError::rejected(self.queue_name.clone(), db_err.to_string())
            }
            other => DispatchError::unreachable(self.queue_name.clone(), other.to_string()),
        }
    }
}

#[async_trait]
impl Dispatcher for PgmqDispatcher {
    #[instrument(skip(self, batch), fields(queue = %self.queue_name, batch_size = batch.len()))]
    async fn dispatch(&self, batch: &[Item]) -> Result<DispatchReceipt, DispatchError> {
        let payload = serde_json::to_value(batch)?;

        let message_id: i64 = sqlx::query_scalar("SELECT * FROM pgmq.send($1, $2::jsonb)")
            .bind(&self.queue_name)
            .bind(&payload)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.map_sqlx_error(e))?;

        debug!(message_id, "Batch submitted to queue");

        Ok(DispatchReceipt::new(self.queue_name.clone(), batch.len())
            .with_queue_message_id(message_id))
    }
}
