//! researcher: the web-research step of an LLM research assistant.
//!
//! Each research loop searches the web, records which sources were
//! gathered, and turns the results into a context block for the next
//! prompt:
//!
//! - **Search**: a local SearxNG instance or the Perplexity API, chosen by
//!   configuration (see [`researcher_search`])
//! - **Sources**: deduplicated by URL, first occurrence wins
//! - **Context**: title, URL and snippet per source, plus an optional
//!   excerpt of the full page capped by a token budget

pub mod config;
pub mod error;
pub mod research;

pub use config::{ResearchConfig, ResearcherConfig};
pub use error::{ResearchError, Result};
pub use research::{ResearchStep, WebResearch};
