//! Output module for consuming crawl results
//!
//! This module handles:
//! - Draining the result stream into a sink
//! - Printing or collecting found nodes
//! - Rendering run statistics

pub mod stats;

pub use stats::{print_statistics, CrawlReport, CrawlStats};

use crate::crawler::{FoundNode, ResultReceiver};

/// Consumer of found nodes
///
/// A sink is a side-effecting callback; nothing it does feeds back into the
/// traversal.
pub trait ResultSink {
    fn found(&mut self, node: &FoundNode);
}

impl<F> ResultSink for F
where
    F: FnMut(&FoundNode),
{
    fn found(&mut self, node: &FoundNode) {
        self(node)
    }
}

/// Prints every found node to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn found(&mut self, node: &FoundNode) {
        println!("Found: {}", node.url);
    }
}

/// Keeps every found node in arrival order
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub nodes: Vec<FoundNode>,
}

impl CollectingSink {
    /// Identifiers of the collected nodes, in arrival order
    pub fn into_urls(self) -> Vec<String> {
        self.nodes.into_iter().map(|n| n.url).collect()
    }
}

impl ResultSink for CollectingSink {
    fn found(&mut self, node: &FoundNode) {
        self.nodes.push(node.clone());
    }
}

/// Drains `receiver` into `sink` until the stream closes
///
/// Returns how many nodes were delivered, and the sink.
pub async fn drain<S: ResultSink>(mut receiver: ResultReceiver, mut sink: S) -> (usize, S) {
    let mut delivered = 0;
    while let Some(node) = receiver.recv().await {
        sink.found(&node);
        delivered += 1;
    }
    tracing::debug!("Result stream closed after {} nodes", delivered);
    (delivered, sink)
}
