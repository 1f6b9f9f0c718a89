//! Prompt-ready rendering of unique sources.

use std::borrow::Cow;

use crate::error::SearchError;
use crate::types::SearchResponse;

use super::dedup::UniqueSources;

/// Rough characters-per-token ratio used to turn a token budget into a
/// character budget.
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended to raw content cut at the character budget.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// First line of every formatted source block.
pub const SOURCES_HEADER: &str = "Sources:\n\n";

const SEPARATOR: &str = "\n===\n";

/// Renders unique sources into one text block for embedding in a prompt.
///
/// Every source gets its title, URL and snippet. With
/// `include_raw_content` set, its full text follows, capped at
/// `max_tokens_per_source * CHARS_PER_TOKEN` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFormatter {
    max_tokens_per_source: usize,
    include_raw_content: bool,
}

/// Formatted text plus the sources whose raw content had to be substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedSources {
    pub text: String,
    /// URLs of sources rendered with an empty raw-content section because
    /// they had none. Always empty when raw content is not included.
    pub missing_raw_content: Vec<String>,
}

impl SourceFormatter {
    /// Create a formatter.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `max_tokens_per_source` is zero.
    pub fn new(
        max_tokens_per_source: usize,
        include_raw_content: bool,
    ) -> Result<Self, SearchError> {
        if max_tokens_per_source == 0 {
            return Err(SearchError::Config(
                "max_tokens_per_source must be greater than 0".into(),
            ));
        }
        Ok(Self {
            max_tokens_per_source,
            include_raw_content,
        })
    }

    pub fn max_tokens_per_source(&self) -> usize {
        self.max_tokens_per_source
    }

    pub fn include_raw_content(&self) -> bool {
        self.include_raw_content
    }

    /// Character budget for each source's raw content.
    pub fn char_limit(&self) -> usize {
        self.max_tokens_per_source.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Render `sources` in order. See [`Self::format_with_report`].
    pub fn format(&self, sources: &UniqueSources) -> String {
        self.format_with_report(sources).text
    }

    /// Render `sources` in order and report missing raw content.
    ///
    /// A source without raw content is rendered with an empty raw section
    /// and logged at warn level; formatting never fails.
    pub fn format_with_report(&self, sources: &UniqueSources) -> FormattedSources {
        let mut text = String::from(SOURCES_HEADER);
        let mut missing_raw_content = Vec::new();
        let char_limit = self.char_limit();

        for source in sources.values() {
            text.push_str(&format!("Source {}:{SEPARATOR}", source.title));
            text.push_str(&format!("URL: {}{SEPARATOR}", source.url));
            text.push_str(&format!(
                "Most relevant content from source: {}{SEPARATOR}",
                source.content
            ));

            if !self.include_raw_content {
                continue;
            }

            let raw = match source.raw_content.as_deref() {
                Some(raw) => raw,
                None => {
                    tracing::warn!(
                        url = %source.url,
                        "no raw content for source, using empty text"
                    );
                    missing_raw_content.push(source.url.clone());
                    ""
                }
            };
            text.push_str(&format!(
                "Full source content limited to {} tokens: {}\n\n",
                self.max_tokens_per_source,
                truncate_chars(raw, char_limit)
            ));
        }

        FormattedSources {
            text: text.trim().to_owned(),
            missing_raw_content,
        }
    }
}

/// Cut `text` to `limit` characters and append [`TRUNCATION_MARKER`], or
/// return it unchanged when it fits.
pub fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => {
            Cow::Owned(format!("{}{TRUNCATION_MARKER}", &text[..byte_index]))
        }
        None => Cow::Borrowed(text),
    }
}

/// Render one response as a bullet list, `* {title} : {url}` per result.
///
/// Results are listed in input order without deduplication.
pub fn bullet_format(response: &SearchResponse) -> String {
    response
        .results
        .iter()
        .map(|source| format!("* {} : {}", source.title, source.url))
        .collect::<Vec<_>>()
        .join("\n")
}
