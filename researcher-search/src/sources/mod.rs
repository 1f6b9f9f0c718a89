//! Source normalisation, deduplication and formatting.
//!
//! Turns one or many provider responses into the text block a research
//! prompt embeds as context:
//!
//! 1. [`normalize`] flattens responses into one ordered list
//! 2. [`deduplicate`] keeps the first result per URL
//! 3. [`SourceFormatter`] renders the unique sources
//!
//! [`bullet_format`] is the short listing used to record which sources a
//! research step gathered.

pub mod dedup;
pub mod format;
pub mod normalize;

pub use dedup::{deduplicate, UniqueSources};
pub use format::{
    bullet_format, FormattedSources, SourceFormatter, CHARS_PER_TOKEN, SOURCES_HEADER,
    TRUNCATION_MARKER,
};
pub use normalize::{normalize, normalize_value, SourceBatch, SourceInput};

use crate::error::SearchError;

/// Normalise, deduplicate and format `input` in one call.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `max_tokens_per_source` is zero.
///
/// # Examples
///
/// ```
/// use researcher_search::sources::deduplicate_and_format_sources;
/// use researcher_search::{SearchResponse, SearchResult};
///
/// let response = SearchResponse::new(vec![
///     SearchResult::new("Rust", "https://rust-lang.org", "A language"),
///     SearchResult::new("Rust again", "https://rust-lang.org", "Duplicate"),
/// ]);
/// let text = deduplicate_and_format_sources(response, 1000, false)?;
/// assert!(text.starts_with("Sources:\n\nSource Rust:"));
/// assert!(!text.contains("Rust again"));
/// # Ok::<(), researcher_search::SearchError>(())
/// ```
pub fn deduplicate_and_format_sources(
    input: impl Into<SourceInput>,
    max_tokens_per_source: usize,
    include_raw_content: bool,
) -> Result<String, SearchError> {
    let formatter = SourceFormatter::new(max_tokens_per_source, include_raw_content)?;
    Ok(formatter.format(&deduplicate(normalize(input))))
}

/// Like [`deduplicate_and_format_sources`] for untyped JSON input.
///
/// # Errors
///
/// Returns [`SearchError::InvalidInputKind`] or [`SearchError::Parse`] for
/// malformed input, and [`SearchError::Config`] for a zero token budget.
pub fn deduplicate_and_format_value(
    value: &serde_json::Value,
    max_tokens_per_source: usize,
    include_raw_content: bool,
) -> Result<String, SearchError> {
    let formatter = SourceFormatter::new(max_tokens_per_source, include_raw_content)?;
    let results = normalize_value(value)?;
    Ok(formatter.format(&deduplicate(results)))
}
