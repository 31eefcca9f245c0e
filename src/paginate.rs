// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Deterministic page math over an already-ordered result list.
//!
//! Pure functions only: no mutation, no session state. Which page a user is
//! looking at belongs to the presentation layer; we just slice.

/// Number of pages needed for `total` items at `page_size` per page.
///
/// Zero items is zero pages — a valid state, and the reason callers must not
/// assume page 1 exists. `page_size == 0` also yields zero pages rather than
/// dividing by zero.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Slice out one 1-indexed page.
///
/// Requesting a page past the end (or page 0, or a zero page size) returns
/// an empty slice, not an error.
pub fn paginate<T>(results: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= results.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(results.len());
    &results[start..end]
}
