//! # Orchestration
//!
//! The poll cycle and the wiring that builds it.
//!
//! - [`SearchPoller`]: walks search pages from the checkpointed cursor,
//!   dispatches each page in fixed-size batches and advances the checkpoint
//!   once a page is fully submitted.
//! - [`HarvesterSystem`]: connects the PostgreSQL checkpoint store and PGMQ
//!   dispatcher around an injected search source.

pub mod bootstrap;
pub mod poller;

pub use bootstrap::HarvesterSystem;
pub use poller::{PollPhase, PollSettings, PollSummary, SearchPoller};
