//! Error types for the researcher crate.

use researcher_search::SearchError;

/// Top-level error type for research steps and configuration.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// Search provider or source formatting error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ResearchError>;
