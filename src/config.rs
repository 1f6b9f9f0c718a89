//! Configuration for research steps.
//!
//! Loaded from `config.toml` (see [`ResearcherConfig::default_config_path`])
//! with a `[research]` table and a `[search]` table, then overridden from
//! the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SEARXNG_URL` | `search.searxng.base_url` |
//! | `PERPLEXITY_API_KEY` | `search.perplexity.api_key` |
//! | `SEARCH_API` | `search.provider` |
//! | `MAX_TOKENS_PER_SOURCE` | `research.max_tokens_per_source` |
//! | `FETCH_FULL_PAGE` | `search.fetch_raw_content` |

use std::path::{Path, PathBuf};

use researcher_search::{SearchConfig, SearchProvider};
use serde::{Deserialize, Serialize};

use crate::error::{ResearchError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearcherConfig {
    /// How gathered sources are turned into prompt context.
    pub research: ResearchConfig,
    /// Provider selection and endpoints.
    pub search: SearchConfig,
}

/// Source formatting settings for a research step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Token budget for each source's raw content excerpt.
    pub max_tokens_per_source: usize,
    /// Embed raw page content in the context. `None` uses the provider's
    /// default (on for SearxNG when pages are fetched, off for Perplexity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_raw_content: Option<bool>,
    /// Providers queried together by [`crate::research::WebResearch::run_all`].
    /// Empty means only `search.provider`.
    pub providers: Vec<SearchProvider>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_source: 1000,
            include_raw_content: None,
            providers: Vec::new(),
        }
    }
}

impl ResearcherConfig {
    /// Load the config file at `path` (or the default path) if it exists,
    /// apply environment overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, an
    /// environment override is malformed, or the result is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(Self::default_config_path, Path::to_path_buf);
        let mut config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading config file");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ResearchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ResearchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    ///
    /// `$RESEARCHER_CONFIG_DIR/config.toml` when set, otherwise
    /// `dirs::config_dir()/researcher/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        let dir = match std::env::var_os("RESEARCHER_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .map(|d| d.join("researcher"))
                .unwrap_or_else(|| PathBuf::from("/tmp/researcher-config")),
        };
        dir.join("config.toml")
    }

    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Config`] for an unparsable value.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get("SEARXNG_URL") {
            self.search.searxng.base_url = url;
        }
        if let Some(key) = get("PERPLEXITY_API_KEY") {
            self.search.perplexity.api_key = Some(key);
        }
        if let Some(provider) = get("SEARCH_API") {
            self.search.provider = provider
                .parse()
                .map_err(|e| ResearchError::Config(format!("SEARCH_API: {e}")))?;
        }
        if let Some(tokens) = get("MAX_TOKENS_PER_SOURCE") {
            self.research.max_tokens_per_source = tokens.trim().parse().map_err(|e| {
                ResearchError::Config(format!("MAX_TOKENS_PER_SOURCE `{tokens}`: {e}"))
            })?;
        }
        if let Some(flag) = get("FETCH_FULL_PAGE") {
            self.search.fetch_raw_content = parse_flag("FETCH_FULL_PAGE", &flag)?;
        }
        Ok(())
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Config`] if any field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.research.max_tokens_per_source == 0 {
            return Err(ResearchError::Config(
                "research.max_tokens_per_source must be greater than 0".into(),
            ));
        }
        self.search
            .validate()
            .map_err(|e| ResearchError::Config(e.to_string()))
    }

    /// Whether formatted context embeds raw page content.
    pub fn include_raw_content(&self) -> bool {
        self.research.include_raw_content.unwrap_or_else(|| {
            self.search.provider.includes_raw_content_by_default()
                && self.search.fetch_raw_content
        })
    }

    /// Providers queried by a multi-provider research step.
    pub fn providers(&self) -> Vec<SearchProvider> {
        if self.research.providers.is_empty() {
            vec![self.search.provider]
        } else {
            self.research.providers.clone()
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ResearchError::Config(format!(
            "{key} must be a boolean, got `{other}`"
        ))),
    }
}
