//! Search projection over a resource collection.
//!
//! The view is pure: nothing is mutated, nothing is cached. Every render
//! recomputes it from the latest collection and search term, so the list can
//! never go stale relative to either.

use crate::records::Resource;

/// Lazy view over `collection` containing the records whose search fields
/// contain `term`, case-insensitively. An empty (or all-whitespace) term
/// yields the whole collection in its original order.
pub fn filtered<'a, T: Resource>(
    collection: &'a [T],
    term: &str,
) -> impl Iterator<Item = &'a T> {
    let needle = term.trim().to_lowercase();
    collection
        .iter()
        .filter(move |record| needle.is_empty() || record.matches(&needle))
}
