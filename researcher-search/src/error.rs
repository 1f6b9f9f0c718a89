//! Error types for the researcher-search crate.
//!
//! Messages are stable and safe to show to users. API keys never appear
//! in error messages.

/// Errors that can occur while searching or formatting sources.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Input to source normalisation was neither a response object with
    /// `results` nor a sequence of responses/results.
    #[error("invalid input kind: {0}")]
    InvalidInputKind(String),

    /// Every requested provider failed to return a response.
    #[error("all search providers failed: {0}")]
    AllProvidersFailed(String),

    /// A provider request timed out.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a provider failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response or a search result could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search or formatting configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Map a [`reqwest::Error`] to [`SearchError::Timeout`] or
    /// [`SearchError::Http`], prefixed with `context`.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for researcher-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_input_kind() {
        let err = SearchError::InvalidInputKind("got a string".into());
        assert_eq!(err.to_string(), "invalid input kind: got a string");
    }

    #[test]
    fn display_all_providers_failed() {
        let err = SearchError::AllProvidersFailed("searxng: HTTP error: refused".into());
        assert_eq!(
            err.to_string(),
            "all search providers failed: searxng: HTTP error: refused"
        );
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 10s limit".into());
        assert_eq!(err.to_string(), "search timed out: exceeded 10s limit");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("missing field `url`".into());
        assert_eq!(err.to_string(), "parse error: missing field `url`");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_results must be > 0".into());
        assert_eq!(err.to_string(), "config error: max_results must be > 0");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
