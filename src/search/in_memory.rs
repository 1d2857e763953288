use super::SearchSource;
use crate::constants::search::DEFAULT_PAGE_LIMIT;
use crate::error::SearchError;
use crate::models::{Cursor, Item, Page};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Corpus-backed search source.
///
/// Items are kept sorted by identifier. A fetch returns, in ascending
/// order, up to `page_limit` items with `id > since` whose payload contains
/// the query text (case-insensitive). `next_cursor` is the largest
/// identifier returned, or `since` unchanged on an empty page.
#[derive(Debug)]
pub struct InMemorySearchSource {
    items: RwLock<Vec<Item>>,
    page_limit: usize,
    fetch_count: AtomicUsize,
}

impl Default for InMemorySearchSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemorySearchSource {
    pub fn new(items: Vec<Item>) -> Self {
        Self::with_page_limit(items, DEFAULT_PAGE_LIMIT)
    }

    /// A zero limit is treated as one item per page.
    pub fn with_page_limit(mut items: Vec<Item>, page_limit: usize) -> Self {
        items.sort_by_key(|item| item.id);
        Self {
            items: RwLock::new(items),
            page_limit: page_limit.max(1),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Add newly published items, as a live provider would between polls
    pub fn publish(&self, new_items: impl IntoIterator<Item = Item>) {
        let mut items = self.items.write();
        items.extend(new_items);
        items.sort_by_key(|item| item.id);
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    /// Number of fetch calls served (for testing)
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    fn matches(item: &Item, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        item.fields.values().any(|value| value_contains(value, needle))
    }
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Array(values) => values.iter().any(|v| value_contains(v, needle)),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        _ => false,
    }
}

#[async_trait]
impl SearchSource for InMemorySearchSource {
    async fn fetch(&self, query: &str, since: Option<Cursor>) -> Result<Page, SearchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let needle = query.trim().to_lowercase();

        let items: Vec<Item> = self
            .items
            .read()
            .iter()
            .filter(|item| since.map_or(true, |since| item.cursor() > since))
            .filter(|item| Self::matches(item, &needle))
            .take(self.page_limit)
            .cloned()
            .collect();

        let next_cursor = items
            .last()
            .map(Item::cursor)
            .or(since)
            .unwrap_or_else(|| Cursor::new(0));

        debug!(
            query = %query,
            since = ?since,
            returned = items.len(),
            next_cursor = %next_cursor,
            "Served in-memory search page"
        );

        Ok(Page::new(items, next_cursor))
    }
}
