//! Integration tests for the crawler
//!
//! These tests drive the traversal engine with an instrumented in-memory
//! graph and check the visited-once, depth and termination guarantees
//! end-to-end.

use fanout_crawler::crawler::{Crawler, FetchResult, Fetcher, FoundNode, IgnoreErrors};
use fanout_crawler::output::CollectingSink;
use fanout_crawler::FetchError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fetcher over an adjacency map that records every call it receives
#[derive(Default)]
struct GraphFetcher {
    edges: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    latency: Duration,
    slow: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl GraphFetcher {
    fn node(mut self, node: &str, links: &[&str]) -> Self {
        self.edges.insert(
            node.to_string(),
            links.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    fn failing(mut self, node: &str) -> Self {
        self.failing.insert(node.to_string());
        self
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delays fetches of `node` by `delay`, on top of the shared latency
    fn slow(mut self, node: &str, delay: Duration) -> Self {
        self.slow.insert(node.to_string(), delay);
        self
    }

    fn calls(&self) -> HashMap<String, usize> {
        self.calls.lock().unwrap().clone()
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(delay) = self.slow.get(url) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(url) {
            return Err(FetchError::new(url, "injected failure"));
        }

        match self.edges.get(url) {
            Some(links) => Ok(FetchResult::new(format!("content of {}", url), links.clone())),
            None => Err(FetchError::new(url, format!("not found: {}", url))),
        }
    }
}

async fn run(fetcher: &Arc<GraphFetcher>, root: &str, depth: u32) -> Vec<FoundNode> {
    let crawler = Crawler::from_shared(Arc::clone(fetcher)).with_error_sink(IgnoreErrors);
    let (report, sink) = tokio::time::timeout(
        Duration::from_secs(10),
        crawler.run(root, depth, CollectingSink::default()),
    )
    .await
    .expect("crawl should terminate")
    .expect("crawl should not fail");

    assert_eq!(report.found, sink.nodes.len());
    assert_eq!(report.visited, sink.nodes.len());
    assert_eq!(
        report.stats.spawned,
        report.stats.claimed + report.stats.skipped
    );
    assert_eq!(
        report.stats.claimed,
        report.stats.fetched + report.stats.boundary
    );

    sink.nodes
}

fn urls(found: &[FoundNode]) -> HashSet<String> {
    found.iter().map(|n| n.url.clone()).collect()
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cycle_is_explored_once() {
    // B answers late so A's edge claims C first, with depth left to fetch it
    let fetcher = Arc::new(
        GraphFetcher::default()
            .node("A", &["B", "C"])
            .node("B", &["A", "C"])
            .node("C", &[])
            .slow("B", Duration::from_millis(50)),
    );

    let found = run(&fetcher, "A", 2).await;

    assert_eq!(found.len(), 3, "no duplicate emissions");
    assert_eq!(urls(&found), set(&["A", "B", "C"]));
    assert_eq!(fetcher.total_calls(), 3);
    assert!(fetcher.calls().values().all(|&n| n == 1));
    assert!(found.iter().all(|n| !n.boundary));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cycle_without_latency_fetches_at_most_once() {
    let fetcher = Arc::new(
        GraphFetcher::default()
            .node("A", &["B", "C"])
            .node("B", &["A", "C"])
            .node("C", &[]),
    );

    for _ in 0..50 {
        let found = run(&fetcher, "A", 2).await;
        assert_eq!(found.len(), 3, "no duplicate emissions");
        assert_eq!(urls(&found), set(&["A", "B", "C"]));
    }

    // C is fetched on the runs where A's edge claims it, and emitted as a
    // boundary node on the runs where B's edge wins
    let calls = fetcher.calls();
    assert_eq!(calls.get("A"), Some(&50));
    assert_eq!(calls.get("B"), Some(&50));
    assert!(calls.get("C").copied().unwrap_or(0) <= 50);
}

#[tokio::test]
async fn test_depth_zero_emits_root_without_fetching() {
    let fetcher = Arc::new(GraphFetcher::default().node("X", &["Y"]).node("Y", &[]));

    let found = run(&fetcher, "X", 0).await;

    assert_eq!(
        found,
        vec![FoundNode {
            url: "X".to_string(),
            hops: 0,
            boundary: true,
        }]
    );
    assert_eq!(fetcher.total_calls(), 0);
    assert!(!fetcher.calls().contains_key("Y"));
}

#[tokio::test]
async fn test_failed_root_is_emitted_without_children() {
    let fetcher = Arc::new(
        GraphFetcher::default()
            .node("A", &["B", "C"])
            .node("B", &[])
            .node("C", &[])
            .failing("A"),
    );

    let crawler = Crawler::from_shared(Arc::clone(&fetcher));
    let errors = Arc::new(Mutex::new(Vec::new()));
    let crawler = crawler.with_error_sink({
        let errors = Arc::clone(&errors);
        move |e: &FetchError| errors.lock().unwrap().push(e.to_string())
    });

    let (report, sink) = crawler
        .run("A", 3, CollectingSink::default())
        .await
        .unwrap();

    assert_eq!(sink.into_urls(), vec!["A"]);
    assert_eq!(report.stats.spawned, 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(fetcher.total_calls(), 1);
    assert_eq!(
        *errors.lock().unwrap(),
        vec!["fetch failed for A: injected failure".to_string()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_dense_graph_fetches_each_node_at_most_once() {
    // Every node links to every node, twice, so each claim is heavily contested.
    let names: Vec<String> = (0..12).map(|i| format!("n{}", i)).collect();
    let links: Vec<&str> = names
        .iter()
        .chain(names.iter())
        .map(String::as_str)
        .collect();
    let fetcher = names
        .iter()
        .fold(GraphFetcher::default(), |graph, name| graph.node(name, &links))
        .with_latency(Duration::from_millis(2));
    let fetcher = Arc::new(fetcher);

    let found = run(&fetcher, "n0", 3).await;

    assert_eq!(found.len(), names.len());
    assert_eq!(urls(&found).len(), names.len());
    assert!(fetcher.calls().values().all(|&n| n == 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_depth_bound_on_chain() {
    let fetcher = Arc::new(
        GraphFetcher::default()
            .node("a", &["b"])
            .node("b", &["c"])
            .node("c", &["d"])
            .node("d", &["e"])
            .node("e", &[]),
    );

    let found = run(&fetcher, "a", 2).await;

    // c sits on the boundary: found, never fetched. d and e are never reached.
    assert_eq!(urls(&found), set(&["a", "b", "c"]));
    assert_eq!(fetcher.calls().keys().cloned().collect::<HashSet<_>>(), set(&["a", "b"]));

    let c = found.iter().find(|n| n.url == "c").unwrap();
    assert_eq!(c.hops, 2);
    assert!(c.boundary);
    assert!(found.iter().filter(|n| n.url != "c").all(|n| !n.boundary));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_links_spawn_but_skip() {
    let fetcher = Arc::new(GraphFetcher::default().node("A", &["B", "B", "B"]).node("B", &[]));

    let crawler = Crawler::from_shared(Arc::clone(&fetcher)).with_error_sink(IgnoreErrors);
    let (report, sink) = crawler
        .run("A", 5, CollectingSink::default())
        .await
        .unwrap();

    assert_eq!(urls(&sink.nodes), set(&["A", "B"]));
    assert_eq!(report.stats.spawned, 4);
    assert_eq!(report.stats.claimed, 2);
    assert_eq!(report.stats.skipped, 2);
    assert_eq!(fetcher.calls().get("B"), Some(&1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_missing_nodes_do_not_stop_the_crawl() {
    let fetcher = Arc::new(
        GraphFetcher::default()
            .node("A", &["gone", "B"])
            .node("B", &["C"])
            .node("C", &[])
            .with_latency(Duration::from_millis(5)),
    );

    let found = run(&fetcher, "A", 4).await;

    assert_eq!(urls(&found), set(&["A", "gone", "B", "C"]));
    assert_eq!(fetcher.calls().get("gone"), Some(&1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stream_closes_after_all_tasks_exit() {
    let fetcher = Arc::new(
        GraphFetcher::default()
            .node("A", &["B", "C"])
            .node("B", &["D"])
            .node("C", &["D"])
            .node("D", &[])
            .with_latency(Duration::from_millis(10)),
    );

    let crawler = Crawler::from_shared(Arc::clone(&fetcher));
    let (mut receiver, completion) = crawler.start("A", 3);

    let mut found = Vec::new();
    while let Some(node) = receiver.recv().await {
        found.push(node.url);
    }

    // The stream only ends once the live-task count has reached zero.
    assert_eq!(completion.live_tasks(), 0);
    let outcome = completion.wait().await.unwrap();

    assert_eq!(found.len(), 4);
    assert_eq!(outcome.visited, set(&["A", "B", "C", "D"]));
    assert_eq!(outcome.stats.claimed, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hops_follow_first_claim() {
    let fetcher = Arc::new(GraphFetcher::default().node("A", &["B"]).node("B", &[]));

    let found = run(&fetcher, "A", 3).await;
    let hops: HashMap<_, _> = found.iter().map(|n| (n.url.as_str(), n.hops)).collect();

    assert_eq!(hops.get("A"), Some(&0));
    assert_eq!(hops.get("B"), Some(&1));
}
