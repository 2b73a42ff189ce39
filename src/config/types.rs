use serde::Deserialize;

/// Root of the built-in Go tour fixture
pub const DEFAULT_ROOT: &str = "https://golang.org/";

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 4;

/// Default simulated latency of a fixture fetch (milliseconds)
pub const DEFAULT_LATENCY_MS: u64 = 1000;

/// Main configuration structure for Fanout-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    /// Canned pages served by the fixture fetcher; empty means the built-in tour
    #[serde(default, rename = "page")]
    pub pages: Vec<PageEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig {
                root: DEFAULT_ROOT.to_string(),
                max_depth: DEFAULT_MAX_DEPTH,
            },
            fetcher: FetcherConfig::default(),
            pages: Vec::new(),
        }
    }
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Node the traversal starts from
    pub root: String,

    /// Maximum number of hops to expand from the root
    #[serde(rename = "max-depth")]
    pub max_depth: u32,
}

/// Fixture fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Simulated latency of every fetch (milliseconds)
    #[serde(rename = "latency-ms", default = "default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY_MS
}

/// A canned page: its body and the links found on it
#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    pub url: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub links: Vec<String>,
}
