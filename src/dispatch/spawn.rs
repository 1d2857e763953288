//! In-process dispatcher: hands each batch to a [`BatchProcessor`] on its
//! own tokio task and returns without awaiting it.

use super::{DispatchReceipt, Dispatcher};
use crate::error::DispatchError;
use crate::models::Item;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, Instrument};

/// Downstream consumer of harvested batches
#[async_trait]
pub trait BatchProcessor: Send + Sync + 'static {
    async fn process(&self, batch: Vec<Item>) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Fire-and-forget dispatcher over an in-process processor.
///
/// Processor failures happen after submission was acknowledged, so they
/// are logged and never reach the poller.
pub struct SpawnDispatcher {
    processor: Arc<dyn BatchProcessor>,
    target: String,
}

impl std::fmt::Debug for SpawnDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnDispatcher")
            .field("target", &self.target)
            .finish()
    }
}

impl SpawnDispatcher {
    pub fn new(processor: Arc<dyn BatchProcessor>, target: impl Into<String>) -> Self {
        Self {
            processor,
            target: target.into(),
        }
    }
}

#[async_trait]
impl Dispatcher for SpawnDispatcher {
    async fn dispatch(&self, batch: &[Item]) -> Result<DispatchReceipt, DispatchError> {
        let receipt = DispatchReceipt::new(self.target.clone(), batch.len());
        let processor = Arc::clone(&self.processor);
        let owned = batch.to_vec();
        let span = tracing::info_span!(
            "batch_processor",
            dispatch_target = %self.target,
            submission_id = %receipt.submission_id,
            batch_size = owned.len()
        );

        tokio::spawn(
            async move {
                if let Err(e) = processor.process(owned).await {
                    error!(error = %e, "Batch processor failed");
                }
            }
            .instrument(span),
        );

        debug!(dispatch_target = %self.target, submission_id = %receipt.submission_id, "Batch handed to processor");
        Ok(receipt)
    }
}
