//! SearxNG provider for a local self-hosted meta-search instance.
//!
//! Queries the instance's JSON API and optionally fetches every result page
//! so the formatter can embed its full text.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::SearchConfig;
use crate::content::{extract_text, is_html_content_type};
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProviderTrait;
use crate::types::{SearchProvider, SearchResponse, SearchResult};

/// SearxNG JSON API client.
///
/// SearxNG returns snippets only, so `raw_content` is filled by fetching
/// each result page when [`SearchConfig::fetch_raw_content`] is set.
pub struct SearxngProvider;

#[derive(Debug, Deserialize)]
struct SearxngPayload {
    #[serde(default)]
    results: Vec<SearxngHit>,
}

#[derive(Debug, Deserialize)]
struct SearxngHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl SearchProviderTrait for SearxngProvider {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<SearchResponse, SearchError> {
        tracing::trace!(query, "SearxNG search");

        let endpoint = search_endpoint(&config.searxng.base_url)?;
        let client = http::build_client(config)?;

        let engines = config.searxng.engines.join(",");
        let max_results = config.max_results.to_string();
        let params = [
            ("q", query),
            ("format", "json"),
            ("engines", engines.as_str()),
            ("language", config.searxng.language.as_str()),
            ("max_results", max_results.as_str()),
        ];

        let response = client
            .get(endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("SearxNG request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("SearxNG HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("SearxNG response read failed", e))?;

        let mut results = parse_searxng_json(&body, config.max_results)?;
        tracing::debug!(count = results.len(), "SearxNG returned results");

        if config.fetch_raw_content {
            attach_raw_content(&mut results, config).await?;
        }

        Ok(SearchResponse::new(results))
    }

    fn provider_type(&self) -> SearchProvider {
        SearchProvider::Searxng
    }
}

/// Build `{base_url}/search`, tolerating a trailing slash on the base.
fn search_endpoint(base_url: &str) -> Result<Url, SearchError> {
    let raw = format!("{}/search", base_url.trim().trim_end_matches('/'));
    Url::parse(&raw)
        .map_err(|e| SearchError::Config(format!("invalid searxng.base_url `{base_url}`: {e}")))
}

/// Parse a SearxNG JSON payload into at most `max_results` results.
///
/// Missing or null string fields become empty strings. `raw_content`
/// is always `None` here.
pub(crate) fn parse_searxng_json(
    body: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let payload: SearxngPayload = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid SearxNG JSON: {e}")))?;

    Ok(payload
        .results
        .into_iter()
        .take(max_results)
        .map(|hit| SearchResult {
            title: hit.title.unwrap_or_default(),
            url: hit.url.unwrap_or_default(),
            content: hit.content.unwrap_or_default(),
            raw_content: None,
        })
        .collect())
}

/// Fetch every result page concurrently and store its text as raw content.
///
/// Individual fetch failures leave `raw_content` as `None`.
async fn attach_raw_content(
    results: &mut [SearchResult],
    config: &SearchConfig,
) -> Result<(), SearchError> {
    let client = http::build_page_client(config)?;
    let max_bytes = config.max_raw_content_bytes;
    let fetches = results
        .iter()
        .map(|result| fetch_raw_content(&client, &result.url, max_bytes));
    let pages = futures::future::join_all(fetches).await;

    for (result, page) in results.iter_mut().zip(pages) {
        result.raw_content = page;
    }
    Ok(())
}

async fn fetch_raw_content(
    client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(url, error = %err, "failed to fetch raw content");
            return None;
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!(url, %status, "raw content fetch returned non-200 status");
        return None;
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(is_html_content_type);

    let body = match read_capped(response, max_bytes).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(url, error = %err, "failed to read raw content body");
            return None;
        }
    };

    if is_html {
        Some(extract_text(&body).unwrap_or(body))
    } else {
        Some(body)
    }
}

/// Read at most `max_bytes` of the body, decoding it as lossy UTF-8.
///
/// Stops pulling chunks once the cap is reached, so an oversized page is
/// neither fully downloaded nor parsed.
async fn read_capped(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> Result<String, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = max_bytes - body.len();
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            tracing::debug!(url = %response.url(), max_bytes, "raw content body capped");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}
