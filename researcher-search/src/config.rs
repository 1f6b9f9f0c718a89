//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] selects the provider and controls timeouts, result
//! counts, raw page fetching and the per-provider endpoints. It
//! deserialises from the `[search]` table of the application config.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SearchProvider;

/// Default cap on bytes read from a fetched result page.
pub const DEFAULT_MAX_RAW_CONTENT_BYTES: usize = 256 * 1024;

/// Configuration for a web search operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider used by [`crate::search`].
    pub provider: SearchProvider,
    /// Maximum number of results kept from a SearxNG response.
    pub max_results: usize,
    /// Provider request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether SearxNG results should have their pages fetched as raw content.
    pub fetch_raw_content: bool,
    /// Timeout for each raw page fetch in seconds.
    pub raw_content_timeout_seconds: u64,
    /// Bytes read from each fetched page; the rest of the body is dropped
    /// before text extraction.
    pub max_raw_content_bytes: usize,
    /// Custom User-Agent. `None` rotates through built-in browser strings.
    pub user_agent: Option<String>,
    pub searxng: SearxngConfig,
    pub perplexity: PerplexityConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::Searxng,
            max_results: 3,
            timeout_seconds: 10,
            fetch_raw_content: true,
            raw_content_timeout_seconds: 5,
            max_raw_content_bytes: DEFAULT_MAX_RAW_CONTENT_BYTES,
            user_agent: None,
            searxng: SearxngConfig::default(),
            perplexity: PerplexityConfig::default(),
        }
    }
}

/// Local SearxNG instance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearxngConfig {
    /// Base URL of the instance, without the `/search` path.
    pub base_url: String,
    /// Upstream engines SearxNG should query.
    pub engines: Vec<String>,
    /// Result language.
    pub language: String,
}

impl Default for SearxngConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            engines: vec!["google".into(), "bing".into(), "duckduckgo".into()],
            language: "en".into(),
        }
    }
}

/// Hosted Perplexity API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerplexityConfig {
    /// Bearer token. Required when Perplexity is queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL, without the `/chat/completions` path.
    pub base_url: String,
    pub model: String,
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.perplexity.ai".into(),
            model: "sonar-pro".into(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` and `raw_content_timeout_seconds` must be greater than 0
    /// - `max_raw_content_bytes` must be greater than 0
    /// - provider base URLs must not be empty
    ///
    /// A missing Perplexity API key is reported when Perplexity is queried,
    /// not here, so a SearxNG-only setup needs no key.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.raw_content_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "raw_content_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_raw_content_bytes == 0 {
            return Err(SearchError::Config(
                "max_raw_content_bytes must be greater than 0".into(),
            ));
        }
        if self.searxng.base_url.trim().is_empty() {
            return Err(SearchError::Config(
                "searxng.base_url must not be empty".into(),
            ));
        }
        if self.perplexity.base_url.trim().is_empty() {
            return Err(SearchError::Config(
                "perplexity.base_url must not be empty".into(),
            ));
        }
        Ok(())
    }
}
