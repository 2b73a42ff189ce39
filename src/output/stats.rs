//! Crawl statistics and run report
//!
//! This module holds the counters gathered by the traversal engine and
//! renders a finished run to stdout.

use chrono::{DateTime, Duration, Utc};

/// Counters gathered while crawling
///
/// Once a crawl has completed:
/// - `spawned == claimed + skipped`
/// - `claimed == fetched + boundary`
/// - `failed <= fetched`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Traversal tasks started, including the root
    pub spawned: u64,

    /// Tasks that won the claim on their node
    pub claimed: u64,

    /// Tasks that found their node already claimed
    pub skipped: u64,

    /// Fetches issued
    pub fetched: u64,

    /// Fetches that returned an error
    pub failed: u64,

    /// Nodes claimed at the depth boundary and never fetched
    pub boundary: u64,
}

impl CrawlStats {
    /// Fetches that returned a page
    pub fn succeeded(&self) -> u64 {
        self.fetched.saturating_sub(self.failed)
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root: String,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Nodes delivered to the result sink
    pub found: usize,

    /// Nodes claimed in the visited set
    pub visited: usize,

    pub stats: CrawlStats,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl
    pub fn elapsed(&self) -> Duration {
        self.finished_at - self.started_at
    }
}

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - Report of a finished crawl
pub fn print_statistics(report: &CrawlReport) {
    let stats = &report.stats;

    println!();
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Root: {}", report.root);
    println!("  Max depth: {}", report.max_depth);
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!(
        "  Duration: {:.3}s",
        report.elapsed().num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!("Traversal:");
    println!("  Tasks spawned: {}", stats.spawned);
    println!("  Nodes found: {}", report.found);
    println!("  Duplicate visits skipped: {}", stats.skipped);
    println!("  Boundary nodes (not fetched): {}", stats.boundary);
    println!();

    let success_rate = if stats.fetched > 0 {
        (stats.succeeded() as f64 / stats.fetched as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Fetch Success Rate: {:.1}% ({} / {} fetches, {} failed)",
        success_rate,
        stats.succeeded(),
        stats.fetched,
        stats.failed
    );
}
