//! # researcher-search
//!
//! Web search providers and prompt-ready source formatting for researcher.
//!
//! ## Design
//!
//! - Two interchangeable providers behind [`SearchProviderTrait`]: a local
//!   SearxNG instance and the hosted Perplexity API
//! - Every provider yields the same [`SearchResponse`] shape
//! - [`sources`] merges responses, drops duplicate URLs (first occurrence
//!   wins) and renders them as text with an optional, token-budgeted
//!   excerpt of each page
//!
//! ## Security
//!
//! - The Perplexity API key is only sent as a bearer token and never logged
//! - Search queries are logged only at trace level

pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod provider;
pub mod providers;
pub mod sources;
pub mod types;

pub use config::{PerplexityConfig, SearchConfig, SearxngConfig};
pub use error::{Result, SearchError};
pub use provider::SearchProviderTrait;
pub use sources::{
    bullet_format, deduplicate, deduplicate_and_format_sources, normalize, SourceFormatter,
};
pub use types::{SearchProvider, SearchResponse, SearchResult};

use providers::{PerplexityProvider, SearxngProvider};

/// Search with the provider selected in `config`.
///
/// Equivalent to [`search_iteration`] with loop index 0.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, and the
/// provider's error if the request fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> researcher_search::Result<()> {
/// let config = researcher_search::SearchConfig::default();
/// let response = researcher_search::search("rust ownership", &config).await?;
/// println!("{}", researcher_search::bullet_format(&response));
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<SearchResponse> {
    search_iteration(query, config, 0).await
}

/// Search with the provider selected in `config` on behalf of research
/// loop `iteration` (zero-based).
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_iteration(
    query: &str,
    config: &SearchConfig,
    iteration: usize,
) -> Result<SearchResponse> {
    config.validate()?;
    query_provider(config.provider, query, config, iteration).await
}

/// Query several providers concurrently.
///
/// Returns the successful responses in `providers` order. Failing
/// providers are logged at warn level and skipped.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration or an
/// empty provider list, and [`SearchError::AllProvidersFailed`] only if
/// every provider fails.
pub async fn search_all(
    query: &str,
    config: &SearchConfig,
    providers: &[SearchProvider],
    iteration: usize,
) -> Result<Vec<SearchResponse>> {
    config.validate()?;
    if providers.is_empty() {
        return Err(SearchError::Config(
            "at least one provider must be requested".into(),
        ));
    }

    let futures = providers.iter().map(|provider| {
        let provider = *provider;
        async move {
            let outcome = query_provider(provider, query, config, iteration).await;
            (provider, outcome)
        }
    });
    let outcomes = futures::future::join_all(futures).await;

    let mut responses = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    for (provider, outcome) in outcomes {
        match outcome {
            Ok(response) => responses.push(response),
            Err(err) => {
                tracing::warn!(%provider, error = %err, "provider query failed");
                errors.push(format!("{provider}: {err}"));
            }
        }
    }

    if responses.is_empty() {
        return Err(SearchError::AllProvidersFailed(errors.join("; ")));
    }
    Ok(responses)
}

/// Query a single provider, dispatching to the concrete implementation.
async fn query_provider(
    provider: SearchProvider,
    query: &str,
    config: &SearchConfig,
    iteration: usize,
) -> Result<SearchResponse> {
    match provider {
        SearchProvider::Searxng => run_provider(&SearxngProvider, query, config).await,
        SearchProvider::Perplexity => {
            run_provider(&PerplexityProvider::new(iteration), query, config).await
        }
    }
}

/// Run one provider and log the outcome under its [`SearchProvider`] name.
async fn run_provider<P: SearchProviderTrait>(
    provider: &P,
    query: &str,
    config: &SearchConfig,
) -> Result<SearchResponse> {
    let kind = provider.provider_type();
    let response = provider.search(query, config).await?;
    tracing::debug!(provider = %kind, count = response.len(), "provider returned results");
    Ok(response)
}
