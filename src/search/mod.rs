//! # Search Source
//!
//! The page-fetching capability the poller walks. A source returns items
//! strictly after the supplied cursor together with a continuation cursor;
//! an empty page is the only exhaustion signal.
//!
//! Concrete provider adapters live outside this crate and implement
//! [`SearchSource`]. [`InMemorySearchSource`] serves a fixed corpus with the
//! same paging semantics for tests and local runs.

mod in_memory;

pub use in_memory::InMemorySearchSource;

use crate::error::SearchError;
use crate::models::{Cursor, Page};
use async_trait::async_trait;

#[async_trait]
pub trait SearchSource: Send + Sync + 'static {
    /// Fetch up to one page of items matching `query` whose identifiers
    /// sort after `since` (or from the beginning when `None`).
    ///
    /// When items are returned, `next_cursor` must be strictly greater than
    /// `since` and usable as the `since` of the following call.
    async fn fetch(&self, query: &str, since: Option<Cursor>) -> Result<Page, SearchError>;
}
