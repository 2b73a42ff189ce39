//! Traversal engine - concurrent, depth-bounded exploration
//!
//! This module contains the recursive exploration logic:
//! - Claiming each node at most once
//! - Emitting claimed nodes to the result stream
//! - Fetching and fanning out one task per outgoing link
//! - Closing the result stream once no task is left

use crate::crawler::error_sink::{ErrorSink, LogErrors};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::scope::{TaskGuard, TaskScope};
use crate::crawler::stream::{result_stream, FoundNode, ResultReceiver, ResultStream};
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlReport, CrawlStats, ResultSink};
use crate::CrawlError;
use chrono::Utc;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

type ExploreTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Per-run counters, updated lock-free by every task
#[derive(Debug, Default)]
struct StatsCounters {
    spawned: AtomicU64,
    claimed: AtomicU64,
    skipped: AtomicU64,
    fetched: AtomicU64,
    failed: AtomicU64,
    boundary: AtomicU64,
}

impl StatsCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            spawned: self.spawned.load(Ordering::Relaxed),
            claimed: self.claimed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            boundary: self.boundary.load(Ordering::Relaxed),
        }
    }
}

/// State shared by every task of one crawl
struct TraversalContext<F> {
    fetcher: Arc<F>,
    errors: Arc<dyn ErrorSink>,
    visited: VisitedSet,
    scope: TaskScope,
    stream: ResultStream,
    stats: StatsCounters,
    max_depth: u32,
}

/// Concurrent crawler over an abstract [`Fetcher`]
///
/// # Example
///
/// ```no_run
/// use fanout_crawler::crawler::{Crawler, FixtureFetcher};
/// use fanout_crawler::output::StdoutSink;
///
/// # async fn example() -> fanout_crawler::Result<()> {
/// let crawler = Crawler::new(FixtureFetcher::golang_tour());
/// let (report, _sink) = crawler.run("https://golang.org/", 4, StdoutSink).await?;
/// println!("{} pages found", report.found);
/// # Ok(())
/// # }
/// ```
pub struct Crawler<F> {
    fetcher: Arc<F>,
    errors: Arc<dyn ErrorSink>,
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler that logs fetch errors
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Capability used to expand every claimed node
    ///
    /// # Returns
    ///
    /// A crawler whose per-node fetch errors go to [`LogErrors`]
    pub fn new(fetcher: F) -> Self {
        Self::from_shared(Arc::new(fetcher))
    }

    /// Creates a crawler over a fetcher the caller keeps a handle to
    pub fn from_shared(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            errors: Arc::new(LogErrors),
        }
    }

    /// Replaces the sink that receives per-node fetch errors
    pub fn with_error_sink(mut self, sink: impl ErrorSink) -> Self {
        self.errors = Arc::new(sink);
        self
    }

    /// Starts exploring from `root`, expanding at most `max_depth` hops
    ///
    /// Returns the read side of the result stream and a handle on the
    /// background completion detector. Must be called from within a Tokio
    /// runtime.
    ///
    /// # Arguments
    ///
    /// * `root` - Node the traversal starts from
    /// * `max_depth` - Hops to expand; nodes reached with no hops left are
    ///   emitted as boundary nodes and never fetched
    ///
    /// # Returns
    ///
    /// * `ResultReceiver` - Yields every claimed node, then `None` once the crawl is done
    /// * `Completion` - Resolves with the run's stats and visited set
    pub fn start(&self, root: impl Into<String>, max_depth: u32) -> (ResultReceiver, Completion) {
        let (stream, receiver) = result_stream();
        let scope = TaskScope::new();

        let context = Arc::new(TraversalContext {
            fetcher: Arc::clone(&self.fetcher),
            errors: Arc::clone(&self.errors),
            visited: VisitedSet::new(),
            scope: scope.clone(),
            stream,
            stats: StatsCounters::default(),
            max_depth,
        });

        // The root is counted before anything can wait on the scope.
        let root_guard = scope.enter();
        spawn_explore(&context, root_guard, root.into(), max_depth);

        let detector = {
            let context = Arc::clone(&context);
            tokio::spawn(async move {
                context.scope.wait_idle().await;
                context.stream.close();
                tracing::debug!("All crawl tasks finished, result stream closed");
                (context.stats.snapshot(), context.visited.snapshot())
            })
        };

        (receiver, Completion { detector, scope })
    }

    /// Runs a complete crawl, draining results into `sink`
    ///
    /// The sink runs on its own task and is handed back together with the
    /// report once the stream has closed and every result has been delivered.
    ///
    /// # Arguments
    ///
    /// * `root` - Node the traversal starts from
    /// * `max_depth` - Hops to expand from the root
    /// * `sink` - Receives every found node, in emission order
    ///
    /// # Returns
    ///
    /// * `Ok((CrawlReport, S))` - Report of the finished run and the sink
    /// * `Err(CrawlError)` - The detector or drain task panicked; fetch errors
    ///   never end up here
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_crawler::crawler::{Crawler, FixtureFetcher};
    /// use fanout_crawler::output::CollectingSink;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> fanout_crawler::Result<()> {
    /// let fetcher = FixtureFetcher::new()
    ///     .with_page("a", "", ["b", "missing"])
    ///     .with_page("b", "", ["a"]);
    ///
    /// let (report, sink) = Crawler::new(fetcher)
    ///     .run("a", 3, CollectingSink::default())
    ///     .await?;
    ///
    /// assert_eq!(report.found, 3);
    /// assert_eq!(report.stats.failed, 1);
    /// let mut urls = sink.into_urls();
    /// urls.sort();
    /// assert_eq!(urls, ["a", "b", "missing"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<S>(
        &self,
        root: impl Into<String>,
        max_depth: u32,
        sink: S,
    ) -> Result<(CrawlReport, S), CrawlError>
    where
        S: ResultSink + Send + 'static,
    {
        let root = root.into();
        let started_at = Utc::now();
        tracing::info!("Starting crawl from {} (max depth {})", root, max_depth);

        let (receiver, completion) = self.start(root.clone(), max_depth);
        let drain = tokio::spawn(crate::output::drain(receiver, sink));

        let outcome = completion.wait().await?;
        let (found, sink) = drain.await?;

        let report = CrawlReport {
            root,
            max_depth,
            started_at,
            finished_at: Utc::now(),
            found,
            visited: outcome.visited.len(),
            stats: outcome.stats,
        };

        tracing::info!(
            "Crawl completed: {} found, {} fetched, {} failed in {}ms",
            report.found,
            report.stats.fetched,
            report.stats.failed,
            report.elapsed().num_milliseconds()
        );

        Ok((report, sink))
    }
}

/// Final state of a crawl as seen by the completion detector
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub stats: CrawlStats,
    /// Every node claimed during the run
    pub visited: HashSet<String>,
}

/// Handle on a running crawl's completion detector
#[derive(Debug)]
pub struct Completion {
    detector: JoinHandle<(CrawlStats, HashSet<String>)>,
    scope: TaskScope,
}

impl Completion {
    /// Number of traversal tasks still running
    pub fn live_tasks(&self) -> usize {
        self.scope.live_tasks()
    }

    /// Waits until every traversal task has exited and the stream is closed
    pub async fn wait(self) -> Result<CrawlOutcome, CrawlError> {
        let (stats, visited) = self.detector.await?;
        Ok(CrawlOutcome { stats, visited })
    }
}

fn spawn_explore<F: Fetcher>(
    context: &Arc<TraversalContext<F>>,
    guard: TaskGuard,
    url: String,
    remaining: u32,
) {
    StatsCounters::bump(&context.stats.spawned);
    tokio::spawn(explore(Arc::clone(context), guard, url, remaining));
}

/// Explores one node; `guard` is released on every exit path
fn explore<F: Fetcher>(
    context: Arc<TraversalContext<F>>,
    guard: TaskGuard,
    url: String,
    remaining: u32,
) -> ExploreTask {
    Box::pin(async move {
        let guard = guard;

        if !context.visited.try_claim(&url) {
            StatsCounters::bump(&context.stats.skipped);
            tracing::debug!("Skipping ... {}", url);
            return;
        }
        StatsCounters::bump(&context.stats.claimed);

        let boundary = remaining == 0;
        let found = FoundNode {
            url,
            hops: context.max_depth - remaining,
            boundary,
        };
        if let Err(e) = context.stream.emit(found.clone()) {
            // Unreachable while `guard` is alive: the stream only closes at zero.
            tracing::error!("{}", e);
        }

        if boundary {
            StatsCounters::bump(&context.stats.boundary);
            return;
        }

        StatsCounters::bump(&context.stats.fetched);
        let page = match context.fetcher.fetch(&found.url).await {
            Ok(page) => page,
            Err(e) => {
                StatsCounters::bump(&context.stats.failed);
                context.errors.report(&e);
                return;
            }
        };

        tracing::trace!(
            "Found: {} ({} bytes, {} links)",
            found.url,
            page.content.len(),
            page.links.len()
        );

        for link in page.links {
            spawn_explore(&context, guard.child(), link, remaining - 1);
        }
    })
}
