//! Deduplication of results by exact URL.
//!
//! The first result seen for a URL wins; later duplicates are dropped
//! whole, without merging any of their fields.

use indexmap::IndexMap;

use crate::types::SearchResult;

/// Unique sources keyed by URL, in order of first occurrence.
pub type UniqueSources = IndexMap<String, SearchResult>;

/// Deduplicate `results` by URL in a single pass.
pub fn deduplicate(results: Vec<SearchResult>) -> UniqueSources {
    let total = results.len();
    let mut unique = UniqueSources::with_capacity(total);

    for result in results {
        unique.entry(result.url.clone()).or_insert(result);
    }

    let dropped = total - unique.len();
    if dropped > 0 {
        tracing::debug!(total, dropped, "dropped duplicate sources");
    }
    unique
}
