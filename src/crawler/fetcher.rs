//! Fetch capability consumed by the traversal engine
//!
//! The engine treats a fetcher as opaque: it may block for any amount of time
//! and may fail. The only assumption is that independent calls can run
//! concurrently without interfering.

use crate::FetchError;
use std::future::Future;

/// Result of a successful fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// Page body; never inspected by the engine
    pub content: String,

    /// Outgoing identifiers, in document order, duplicates preserved
    pub links: Vec<String>,
}

impl FetchResult {
    /// Creates a fetch result from a body and its outgoing links
    pub fn new(content: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            content: content.into(),
            links,
        }
    }
}

/// Expands one node into its content and outgoing edges
///
/// # Example
///
/// ```
/// use fanout_crawler::crawler::{FetchResult, Fetcher};
/// use fanout_crawler::FetchError;
///
/// struct Leaf;
///
/// impl Fetcher for Leaf {
///     async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
///         Ok(FetchResult::new(format!("page {}", url), Vec::new()))
///     }
/// }
/// ```
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches `url`, returning its body and the links found on it
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResult, FetchError>> + Send;
}
