//! Search provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::provider::SearchProviderTrait`] for one backend.

pub mod perplexity;
pub mod searxng;

pub use perplexity::PerplexityProvider;
pub use searxng::SearxngProvider;
