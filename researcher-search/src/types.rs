//! Core types shared by providers and the source formatter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// One web page or document returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Text label for the source.
    pub title: String,
    /// Location of the source. Used as the deduplication key.
    pub url: String,
    /// Short snippet or summary of the page.
    pub content: String,
    /// Full extracted page text, when the provider fetched it.
    #[serde(default)]
    pub raw_content: Option<String>,
}

impl SearchResult {
    /// Construct a result without raw content.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            raw_content: None,
        }
    }

    /// Attach full page text to this result.
    #[must_use]
    pub fn with_raw_content(mut self, raw_content: impl Into<String>) -> Self {
        self.raw_content = Some(raw_content.into());
        self
    }
}

/// An ordered batch of results returned by one provider for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

impl From<Vec<SearchResult>> for SearchResponse {
    fn from(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

/// Supported search providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Local self-hosted SearxNG meta-search instance.
    #[default]
    Searxng,
    /// Hosted Perplexity LLM-search API.
    Perplexity,
}

impl SearchProvider {
    /// Stable lowercase name, as used in config files and env vars.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Searxng => "searxng",
            Self::Perplexity => "perplexity",
        }
    }

    /// Whether formatted context should embed raw page content by default
    /// for this provider.
    ///
    /// Perplexity's answer already is the full content of its first
    /// result, so repeating it as a raw excerpt adds nothing.
    pub fn includes_raw_content_by_default(&self) -> bool {
        match self {
            Self::Searxng => true,
            Self::Perplexity => false,
        }
    }

    /// Returns all available provider variants.
    pub fn all() -> &'static [SearchProvider] {
        &[Self::Searxng, Self::Perplexity]
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchProvider {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "searxng" => Ok(Self::Searxng),
            "perplexity" => Ok(Self::Perplexity),
            other => Err(SearchError::Config(format!(
                "unknown search provider `{other}`; expected searxng or perplexity"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_builder() {
        let result = SearchResult::new("Example", "https://example.com", "snippet")
            .with_raw_content("full text");
        assert_eq!(result.title, "Example");
        assert_eq!(result.raw_content.as_deref(), Some("full text"));
    }

    #[test]
    fn missing_raw_content_deserializes_as_none() {
        let json = r#"{"title":"A","url":"u1","content":"c1"}"#;
        let result: SearchResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(result.url, "u1");
        assert!(result.raw_content.is_none());
    }

    #[test]
    fn null_raw_content_deserializes_as_none() {
        let json = r#"{"title":"A","url":"u1","content":"c1","raw_content":null}"#;
        let result: SearchResult = serde_json::from_str(json).expect("deserialize");
        assert!(result.raw_content.is_none());
    }

    #[test]
    fn missing_url_is_rejected() {
        let json = r#"{"title":"A","content":"c1"}"#;
        let result: std::result::Result<SearchResult, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn response_from_vec() {
        let response = SearchResponse::from(vec![SearchResult::new("A", "u1", "c1")]);
        assert_eq!(response.len(), 1);
        assert!(!response.is_empty());
        assert!(SearchResponse::default().is_empty());
    }

    #[test]
    fn provider_display_and_parse() {
        for provider in SearchProvider::all() {
            let parsed: SearchProvider = provider.to_string().parse().expect("parse");
            assert_eq!(parsed, *provider);
        }
        assert_eq!(
            " Perplexity ".parse::<SearchProvider>().ok(),
            Some(SearchProvider::Perplexity)
        );
    }

    #[test]
    fn unknown_provider_rejected() {
        let err = "tavily".parse::<SearchProvider>().unwrap_err();
        assert!(err.to_string().contains("tavily"));
    }

    #[test]
    fn provider_serializes_lowercase() {
        let json = serde_json::to_string(&SearchProvider::Perplexity).expect("serialize");
        assert_eq!(json, "\"perplexity\"");
    }

    #[test]
    fn raw_content_defaults_per_provider() {
        assert!(SearchProvider::Searxng.includes_raw_content_by_default());
        assert!(!SearchProvider::Perplexity.includes_raw_content_by_default());
    }
}
