//! Harvested items and search pages.

use super::Cursor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single search result.
///
/// Only `id` is interpreted by the harvester; every other field of the
/// provider's record is kept verbatim in `fields` and re-emitted unchanged
/// when the item is dispatched downstream, in the provider's key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    pub fn new(id: i64, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Item carrying only an identifier
    pub fn bare(id: i64) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Position of this item in the result set
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.id)
    }
}

/// One response from a search source.
///
/// An empty `items` vector is the only exhaustion signal; a short page is
/// not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Item>,
    pub next_cursor: Cursor,
}

impl Page {
    pub fn new(items: Vec<Item>, next_cursor: Cursor) -> Self {
        Self { items, next_cursor }
    }

    /// Exhaustion page. The cursor is carried through unchanged.
    pub fn empty(next_cursor: Cursor) -> Self {
        Self {
            items: Vec::new(),
            next_cursor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
