//! # Batch Dispatch
//!
//! Fire-and-forget submission of item batches to the downstream processor.
//! A successful [`Dispatcher::dispatch`] only acknowledges that the batch was
//! accepted for asynchronous processing; it never waits for the processor to
//! finish. A failed submission is returned to the caller, which aborts the
//! rest of the cycle instead of dropping the batch.

mod pgmq;
mod spawn;

pub use pgmq::PgmqDispatcher;
pub use spawn::{BatchProcessor, SpawnDispatcher};

use crate::error::DispatchError;
use crate::models::Item;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement that a batch was accepted for asynchronous processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub submission_id: Uuid,
    pub target: String,
    pub item_count: usize,
    /// Message id assigned by the downstream queue, when there is one
    pub queue_message_id: Option<i64>,
    pub submitted_at: DateTime<Utc>,
}

impl DispatchReceipt {
    pub fn new(target: impl Into<String>, item_count: usize) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            target: target.into(),
            item_count,
            queue_message_id: None,
            submitted_at: Utc::now(),
        }
    }

    pub fn with_queue_message_id(mut self, message_id: i64) -> Self {
        self.queue_message_id = Some(message_id);
        self
    }
}

#[async_trait]
pub trait Dispatcher: Send + Sync + 'static {
    /// Submit one ordered batch. Returns once the submission is accepted.
    async fn dispatch(&self, batch: &[Item]) -> Result<DispatchReceipt, DispatchError>;
}
