//! # Search Poller
//!
//! Drives one harvest cycle end to end:
//!
//! ```text
//! Idle -> ReadingCheckpoint? -> FetchingPage -> SplittingAndDispatching
//!      -> AdvancingCheckpoint? -> FetchingPage ... -> Done
//! ```
//!
//! Pages are fetched strictly in sequence because each fetch depends on the
//! previous page's cursor. Every batch of a page is submitted, in item
//! order, before the checkpoint advances to that page's cursor, so a crash
//! mid-page re-delivers the page on the next cycle instead of losing it.
//!
//! The poller keeps no state between invocations. Overlapping cycles are
//! coordinated only by the checkpoint store's conditional advance.

use crate::batching::split_batches;
use crate::checkpoint::{AdvanceOutcome, CheckpointStore};
use crate::config::HarvesterConfig;
use crate::dispatch::Dispatcher;
use crate::error::{ConfigError, HarvestError, Result};
use crate::models::{Cursor, Page};
use crate::search::SearchSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Phase of a poll cycle, used for transition logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    ReadingCheckpoint,
    FetchingPage,
    SplittingAndDispatching,
    AdvancingCheckpoint,
    Done,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollPhase::Idle => "idle",
            PollPhase::ReadingCheckpoint => "reading_checkpoint",
            PollPhase::FetchingPage => "fetching_page",
            PollPhase::SplittingAndDispatching => "splitting_and_dispatching",
            PollPhase::AdvancingCheckpoint => "advancing_checkpoint",
            PollPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Cycle parameters resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub query: String,
    pub batch_size: NonZeroUsize,
    pub resumable: bool,
    pub max_pages_per_cycle: Option<usize>,
}

impl PollSettings {
    pub fn new(query: impl Into<String>, batch_size: NonZeroUsize) -> Self {
        Self {
            query: query.into(),
            batch_size,
            resumable: false,
            max_pages_per_cycle: None,
        }
    }

    pub fn resumable(mut self, resumable: bool) -> Self {
        self.resumable = resumable;
        self
    }

    /// Cap the pages fetched per cycle. Honoured only in resumable mode;
    /// without a checkpoint every cycle restarts from the beginning, so a cap
    /// would hide every page past it.
    pub fn max_pages_per_cycle(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages_per_cycle = max_pages;
        self
    }

    /// Cap in effect for a cycle
    pub fn page_cap(&self) -> Option<usize> {
        self.max_pages_per_cycle.filter(|_| self.resumable)
    }

    pub fn from_config(config: &HarvesterConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            query: config.search.text.clone(),
            batch_size: config.batch_size()?,
            resumable: config.checkpoint.resumable,
            max_pages_per_cycle: config.search.max_pages_per_cycle,
        })
    }
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSummary {
    /// Cursor the cycle started from
    pub starting_cursor: Option<Cursor>,
    /// In-memory cursor after the last processed page
    pub final_cursor: Option<Cursor>,
    /// Search calls made, including the terminating empty page
    pub fetches: usize,
    /// Non-empty pages fully dispatched
    pub pages_processed: usize,
    pub items_harvested: usize,
    pub batches_dispatched: usize,
    pub checkpoint_advances: usize,
    /// Advances skipped because the store was already at or past the cursor
    pub checkpoint_advances_skipped: usize,
    /// The cycle stopped at `max_pages_per_cycle` rather than exhaustion
    pub page_cap_reached: bool,
    pub processing_duration_ms: u64,
}

/// Harvest cycle driver over injected collaborators
pub struct SearchPoller {
    settings: PollSettings,
    search: Arc<dyn SearchSource>,
    dispatcher: Arc<dyn Dispatcher>,
    checkpoint: Arc<dyn CheckpointStore>,
}

impl fmt::Debug for SearchPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchPoller")
            .field("settings", &self.settings)
            .finish()
    }
}

impl SearchPoller {
    pub fn new(
        settings: PollSettings,
        search: Arc<dyn SearchSource>,
        dispatcher: Arc<dyn Dispatcher>,
        checkpoint: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            settings,
            search,
            dispatcher,
            checkpoint,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Run one harvest cycle.
    ///
    /// Any fetch, dispatch or checkpoint-store failure aborts the cycle and
    /// is returned; the checkpoint then still points at or before the last
    /// fully dispatched page.
    #[instrument(skip(self), fields(query = %self.settings.query, resumable = self.settings.resumable))]
    pub async fn poll(&self) -> Result<PollSummary> {
        let start_time = Instant::now();
        let mut phase = PollPhase::Idle;

        let mut since = if self.settings.resumable {
            transition(&mut phase, PollPhase::ReadingCheckpoint);
            self.checkpoint.read().await?
        } else {
            None
        };

        info!(since = ?since, batch_size = self.settings.batch_size.get(), "🚀 Starting poll cycle");

        let page_cap = self.settings.page_cap();
        if page_cap.is_none() {
            if let Some(cap) = self.settings.max_pages_per_cycle {
                warn!(
                    max_pages_per_cycle = cap,
                    "Page cap ignored outside resumable mode, harvesting to exhaustion"
                );
            }
        }

        let mut summary = PollSummary {
            starting_cursor: since,
            final_cursor: since,
            ..PollSummary::default()
        };

        loop {
            if let Some(cap) = page_cap {
                if summary.pages_processed >= cap {
                    warn!(
                        max_pages_per_cycle = cap,
                        cursor = ?since,
                        "Page cap reached, ending cycle before exhaustion"
                    );
                    summary.page_cap_reached = true;
                    break;
                }
            }

            transition(&mut phase, PollPhase::FetchingPage);
            let page = self.search.fetch(&self.settings.query, since).await?;
            summary.fetches += 1;

            if page.is_empty() {
                debug!(cursor = ?since, "Empty page, search exhausted");
                break;
            }

            ensure_cursor_advances(since, &page)?;

            transition(&mut phase, PollPhase::SplittingAndDispatching);
            summary.batches_dispatched += self.dispatch_page(&page).await?;
            summary.items_harvested += page.len();
            summary.pages_processed += 1;

            if self.settings.resumable {
                transition(&mut phase, PollPhase::AdvancingCheckpoint);
                match self.checkpoint.advance(page.next_cursor).await? {
                    AdvanceOutcome::Advanced => summary.checkpoint_advances += 1,
                    AdvanceOutcome::Unchanged => {
                        debug!(
                            cursor = %page.next_cursor,
                            "Checkpoint already advanced by another writer"
                        );
                        summary.checkpoint_advances_skipped += 1;
                    }
                }
            }

            since = Some(page.next_cursor);
            summary.final_cursor = since;
        }

        transition(&mut phase, PollPhase::Done);
        summary.processing_duration_ms = duration_millis(start_time.elapsed());

        info!(
            pages = summary.pages_processed,
            items = summary.items_harvested,
            batches = summary.batches_dispatched,
            final_cursor = ?summary.final_cursor,
            duration_ms = summary.processing_duration_ms,
            "✅ Poll cycle complete"
        );

        Ok(summary)
    }

    /// Submit every batch of `page` in order. Stops at the first failure.
    async fn dispatch_page(&self, page: &Page) -> Result<usize> {
        let mut dispatched = 0;
        for batch in split_batches(&page.items, self.settings.batch_size) {
            let receipt = self.dispatcher.dispatch(batch).await?;
            debug!(
                submission_id = %receipt.submission_id,
                queue_message_id = ?receipt.queue_message_id,
                batch_size = receipt.item_count,
                "Batch dispatched"
            );
            dispatched += 1;
        }
        Ok(dispatched)
    }
}

fn transition(phase: &mut PollPhase, next: PollPhase) {
    debug!(from = %phase, to = %next, "Poll phase transition");
    *phase = next;
}

/// Whole milliseconds, saturating at `u64::MAX`
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A non-empty page must move the cursor forward, otherwise the loop would
/// refetch the same page forever.
fn ensure_cursor_advances(since: Option<Cursor>, page: &Page) -> Result<()> {
    match since {
        Some(since) if page.next_cursor <= since => Err(HarvestError::CursorStalled {
            since,
            next: page.next_cursor,
            item_count: page.len(),
        }),
        _ => Ok(()),
    }
}
