#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, PGMQ in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Search Harvester
//!
//! Incremental harvesting of cursor-paginated search results.
//!
//! ## Overview
//!
//! Each poll cycle walks a search source page by page using an opaque,
//! monotonically increasing cursor, splits every page into fixed-size
//! batches, submits each batch to a downstream processor without waiting
//! for it, and records the page's cursor in a durable checkpoint so the
//! next cycle resumes where this one stopped.
//!
//! Delivery is at-least-once: the checkpoint only advances after a page is
//! fully submitted, and only ever forward.
//!
//! ## Module Organization
//!
//! - [`checkpoint`] - Checkpoint store contract with PostgreSQL and in-memory stores
//! - [`search`] - Search source contract and an in-memory corpus source
//! - [`batching`] - Page-to-batch splitting
//! - [`dispatch`] - Fire-and-forget batch dispatch (PGMQ, spawned tasks)
//! - [`orchestration`] - Poll cycle driver and bootstrap
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use search_harvester::checkpoint::InMemoryCheckpointStore;
//! use search_harvester::dispatch::{BatchProcessor, SpawnDispatcher};
//! use search_harvester::models::Item;
//! use search_harvester::orchestration::{PollSettings, SearchPoller};
//! use search_harvester::search::InMemorySearchSource;
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! struct PrintProcessor;
//!
//! #[async_trait::async_trait]
//! impl BatchProcessor for PrintProcessor {
//!     async fn process(&self, batch: Vec<Item>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!         println!("processing {} items", batch.len());
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> search_harvester::Result<()> {
//! let corpus: Vec<Item> = serde_json::from_value(serde_json::json!([
//!     {"id": 1, "full_text": "Hello from #rustlang"},
//!     {"id": 2, "full_text": "Async rustlang patterns"}
//! ]))
//! .unwrap();
//!
//! let settings = PollSettings::new("rustlang", NonZeroUsize::new(20).unwrap()).resumable(true);
//! let poller = SearchPoller::new(
//!     settings,
//!     Arc::new(InMemorySearchSource::new(corpus)),
//!     Arc::new(SpawnDispatcher::new(Arc::new(PrintProcessor), "printer")),
//!     Arc::new(InMemoryCheckpointStore::default()),
//! );
//!
//! let summary = poller.poll().await?;
//! println!("harvested {} items", summary.items_harvested);
//! # Ok(())
//! # }
//! ```

pub mod batching;
pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod search;

pub use checkpoint::{AdvanceOutcome, CheckpointStore};
pub use config::HarvesterConfig;
pub use dispatch::{DispatchReceipt, Dispatcher};
pub use error::{CheckpointError, ConfigError, DispatchError, HarvestError, Result, SearchError};
pub use models::{Cursor, Item, Page};
pub use orchestration::{HarvesterSystem, PollSettings, PollSummary, SearchPoller};
pub use search::SearchSource;
