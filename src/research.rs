//! One web-research step: search, list the gathered sources, and build the
//! deduplicated, formatted context for the next prompt.

use researcher_search::sources::{deduplicate, normalize, FormattedSources};
use researcher_search::{bullet_format, SearchResponse, SourceFormatter};
use serde::Serialize;

use crate::config::ResearcherConfig;
use crate::error::Result;

/// Output of a research step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchStep {
    /// The query that was searched.
    pub query: String,
    /// `* {title} : {url}` lines for every result, duplicates included.
    pub sources_gathered: String,
    /// Deduplicated sources rendered as prompt context.
    pub web_research_results: String,
    /// URLs whose raw content was missing when it was requested.
    pub missing_raw_content: Vec<String>,
}

/// Runs research steps with a fixed configuration.
#[derive(Debug, Clone)]
pub struct WebResearch {
    config: ResearcherConfig,
    formatter: SourceFormatter,
}

impl WebResearch {
    /// Create a runner for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResearchError::Config`] if `config` is invalid.
    pub fn new(config: ResearcherConfig) -> Result<Self> {
        config.validate()?;
        let formatter = SourceFormatter::new(
            config.research.max_tokens_per_source,
            config.include_raw_content(),
        )?;
        Ok(Self { config, formatter })
    }

    pub fn config(&self) -> &ResearcherConfig {
        &self.config
    }

    /// Search `query` with the configured provider for research loop
    /// `loop_index` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResearchError::Search`] if the provider fails.
    pub async fn run(&self, query: &str, loop_index: usize) -> Result<ResearchStep> {
        tracing::info!(
            provider = %self.config.search.provider,
            loop_index,
            "running web research"
        );
        let response =
            researcher_search::search_iteration(query, &self.config.search, loop_index).await?;
        Ok(self.compose(query, vec![response]))
    }

    /// Search `query` with every configured provider concurrently and merge
    /// their responses. Providers that fail are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResearchError::Search`] if every provider fails.
    pub async fn run_all(&self, query: &str, loop_index: usize) -> Result<ResearchStep> {
        let providers = self.config.providers();
        tracing::info!(providers = providers.len(), loop_index, "running web research");
        let responses =
            researcher_search::search_all(query, &self.config.search, &providers, loop_index)
                .await?;
        Ok(self.compose(query, responses))
    }

    /// Build a step from responses that were already fetched.
    pub fn compose(&self, query: &str, responses: Vec<SearchResponse>) -> ResearchStep {
        let sources_gathered = responses
            .iter()
            .filter(|response| !response.is_empty())
            .map(bullet_format)
            .collect::<Vec<_>>()
            .join("\n");

        let unique = deduplicate(normalize(responses));
        let FormattedSources {
            text,
            missing_raw_content,
        } = self.formatter.format_with_report(&unique);

        if !missing_raw_content.is_empty() {
            tracing::warn!(
                count = missing_raw_content.len(),
                "sources formatted without raw content"
            );
        }

        ResearchStep {
            query: query.to_owned(),
            sources_gathered,
            web_research_results: text,
            missing_raw_content,
        }
    }
}
