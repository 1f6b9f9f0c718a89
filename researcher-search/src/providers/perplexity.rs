//! Perplexity provider for the hosted LLM-search API.
//!
//! Perplexity answers with one synthesised text plus a list of citation
//! URLs. The answer becomes the first result; every further citation
//! becomes a pointer result without content of its own.

use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProviderTrait;
use crate::types::{SearchProvider, SearchResponse, SearchResult};

const SYSTEM_PROMPT: &str = "Search the web and provide factual information with sources.";

/// Citation used when the API returns none.
pub const FALLBACK_CITATION: &str = "https://perplexity.ai";

/// Content of every result after the first.
pub const SEE_ABOVE: &str = "See above for full content";

/// Perplexity chat-completions client.
///
/// `search_index` is the zero-based research loop this search belongs to;
/// it numbers the result titles (`Perplexity Search {n+1}, Source {i}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PerplexityProvider {
    pub search_index: usize,
}

impl PerplexityProvider {
    pub fn new(search_index: usize) -> Self {
        Self { search_index }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl SearchProviderTrait for PerplexityProvider {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<SearchResponse, SearchError> {
        tracing::trace!(query, search_index = self.search_index, "Perplexity search");

        let api_key = config
            .perplexity
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SearchError::Config("perplexity.api_key is not set".into()))?;

        let client = http::build_client(config)?;
        let endpoint = format!(
            "{}/chat/completions",
            config.perplexity.base_url.trim().trim_end_matches('/')
        );
        let payload = json!({
            "model": config.perplexity.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": query}
            ]
        });

        let response = client
            .post(&endpoint)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Perplexity request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Perplexity HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("Perplexity response read failed", e))?;

        let results = parse_perplexity_json(&body, self.search_index)?;
        tracing::debug!(count = results.len(), "Perplexity returned citations");
        Ok(SearchResponse::new(results))
    }

    fn provider_type(&self) -> SearchProvider {
        SearchProvider::Perplexity
    }
}

/// Map a chat-completions payload into search results.
pub(crate) fn parse_perplexity_json(
    body: &str,
    search_index: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid Perplexity JSON: {e}")))?;

    let answer = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| SearchError::Parse("Perplexity response has no choices".into()))?;

    let citations = match completion.citations {
        Some(citations) if !citations.is_empty() => citations,
        _ => vec![FALLBACK_CITATION.to_owned()],
    };

    let search_number = search_index + 1;
    let results = citations
        .into_iter()
        .enumerate()
        .map(|(i, url)| {
            let title = format!("Perplexity Search {search_number}, Source {}", i + 1);
            if i == 0 {
                SearchResult::new(title, url, answer.clone()).with_raw_content(answer.clone())
            } else {
                SearchResult::new(title, url, SEE_ABOVE)
            }
        })
        .collect();

    Ok(results)
}
