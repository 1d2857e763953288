//! Search cursor: the ordered position marker shared by the search source,
//! the checkpoint store and the poller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, totally ordered position in a remote result set.
///
/// In practice this is the identifier of the most recently consumed item.
/// Absence of a cursor is always expressed as `Option<Cursor>::None`, never
/// as a sentinel value, so `Cursor::new(0)` is a legitimate position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Cursor {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Cursor> for i64 {
    fn from(cursor: Cursor) -> Self {
        cursor.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
