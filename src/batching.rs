//! # Batch Splitting
//!
//! Partitions one page of items into the ordered, contiguous batches that
//! are dispatched downstream. Every batch holds exactly `batch_size` items
//! except possibly the last, which holds the remainder. An empty input
//! yields no batches; an empty batch is never produced.

use std::num::NonZeroUsize;
use std::slice::Chunks;

/// Lazily split `items` into batches of at most `batch_size`.
///
/// The iterator borrows the input, so it can be recomputed from the same
/// slice with identical results.
pub fn split_batches<T>(items: &[T], batch_size: NonZeroUsize) -> Chunks<'_, T> {
    items.chunks(batch_size.get())
}

/// Number of batches `split_batches` yields for `len` items.
pub fn batch_count(len: usize, batch_size: NonZeroUsize) -> usize {
    len.div_ceil(batch_size.get())
}
