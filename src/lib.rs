//! Fanout-Crawler: a concurrent, depth-bounded graph crawler
//!
//! This crate explores the subgraph reachable from a root node, expanding each
//! node at most once and fanning out one task per discovered edge. Every newly
//! claimed node is emitted to a result stream that closes once no traversal
//! work remains.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Fanout-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Boxed cause carried by a [`FetchError`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single failure a traversal step can hit: fetching one node
///
/// A fetch error only ends the task that hit it. It is handed to the crawler's
/// [`ErrorSink`](crate::crawler::ErrorSink) and never reaches the caller of the crawl.
#[derive(Debug, Error)]
#[error("fetch failed for {url}: {source}")]
pub struct FetchError {
    /// The node whose fetch failed
    pub url: String,

    #[source]
    source: BoxError,
}

impl FetchError {
    /// Creates a fetch error for `url` with the underlying cause
    pub fn new(url: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            url: url.into(),
            source: cause.into(),
        }
    }

    /// Returns the underlying cause
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// Result type alias for Fanout-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Fetcher, FixtureFetcher, FoundNode};
pub use output::{CrawlReport, CrawlStats, ResultSink};
