//! Crawler module for concurrent graph traversal
//!
//! This module contains the core crawling logic, including:
//! - The abstract fetch capability and a canned fixture implementation
//! - Visited-once claiming of nodes
//! - Task-per-edge fan-out with completion detection
//! - The result stream drained by the output sink

mod engine;
mod error_sink;
mod fetcher;
mod fixture;
mod scope;
mod stream;
mod visited;

pub use engine::{Completion, CrawlOutcome, Crawler};
pub use error_sink::{ErrorSink, IgnoreErrors, LogErrors};
pub use fetcher::{FetchResult, Fetcher};
pub use fixture::{FixtureError, FixtureFetcher};
pub use scope::{TaskGuard, TaskScope};
pub use stream::{result_stream, FoundNode, ResultReceiver, ResultStream, StreamClosed};
pub use visited::VisitedSet;

use crate::config::Config;
use crate::output::{CrawlReport, ResultSink};
use crate::CrawlError;

/// Runs a complete crawl as described by `config`
///
/// Serves pages from the configured fixture (or the built-in Go tour) and
/// delivers every found node to `sink`.
///
/// # Arguments
///
/// * `config` - Root, maximum depth and fixture pages
/// * `sink` - Receives every found node
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(CrawlError)` - A background crawl task failed
///
/// # Example
///
/// ```no_run
/// use fanout_crawler::config::Config;
/// use fanout_crawler::crawler::crawl;
/// use fanout_crawler::output::StdoutSink;
///
/// # async fn example() -> fanout_crawler::Result<()> {
/// let report = crawl(&Config::default(), StdoutSink).await?;
/// println!("{} nodes found", report.found);
/// # Ok(())
/// # }
/// ```
pub async fn crawl<S>(config: &Config, sink: S) -> Result<CrawlReport, CrawlError>
where
    S: ResultSink + Send + 'static,
{
    let crawler = Crawler::new(FixtureFetcher::from_config(config));
    let (report, _sink) = crawler
        .run(config.crawler.root.as_str(), config.crawler.max_depth, sink)
        .await?;
    Ok(report)
}
