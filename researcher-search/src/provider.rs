//! Trait definition for interchangeable search providers.
//!
//! SearxNG and Perplexity both implement [`SearchProviderTrait`], so the
//! formatter and callers never branch on which backend produced a
//! [`SearchResponse`].

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchProvider, SearchResponse};

/// A backend that produces a [`SearchResponse`] for a query string.
///
/// Implementations own request construction, response parsing and the
/// mapping into the common result shape. Transport failures are returned
/// as errors and are not retried.
///
/// All implementations must be `Send + Sync` so responses from several
/// providers can be awaited concurrently.
pub trait SearchProviderTrait: Send + Sync {
    /// Run `query` against this provider.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, times out, or the
    /// response cannot be parsed.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<SearchResponse, SearchError>> + Send;

    /// Returns which [`SearchProvider`] variant this implementation represents.
    fn provider_type(&self) -> SearchProvider;
}
