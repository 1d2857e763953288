#![allow(dead_code)]

use proptest::prelude::*;

/// Strictly increasing item ids, as a search source would page them
pub fn ascending_ids_strategy(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(0i64..1_000_000, 0..max_len)
        .prop_map(|ids| ids.into_iter().collect())
}

/// Positive batch sizes, including sizes larger than typical pages
pub fn batch_size_strategy() -> impl Strategy<Value = usize> {
    1usize..64
}

/// Arbitrary sequence of cursors submitted to a checkpoint store
pub fn cursor_sequence_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000i64..1_000, 0..40)
}

/// Split of `ids` into consecutive non-empty pages with the given sizes
pub fn paginate(ids: &[i64], page_sizes: &[usize]) -> Vec<Vec<i64>> {
    let mut pages = Vec::new();
    let mut rest = ids;
    let mut sizes = page_sizes.iter().cycle();
    while !rest.is_empty() {
        let size = sizes.next().copied().unwrap_or(1).max(1).min(rest.len());
        let (page, tail) = rest.split_at(size);
        pages.push(page.to_vec());
        rest = tail;
    }
    pages
}
