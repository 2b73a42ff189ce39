use crate::config::types::{Config, CrawlerConfig, FetcherConfig, PageEntry};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Deepest traversal a config may request; fan-out is unbounded per level
pub const MAX_DEPTH_LIMIT: u32 = 32;

/// Longest simulated fetch latency a config may request (milliseconds)
pub const MAX_LATENCY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_pages(&config.pages)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() {
        return Err(ConfigError::Validation("root cannot be empty".to_string()));
    }

    Url::parse(&config.root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root '{}': {}", config.root, e)))?;

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.latency_ms > MAX_LATENCY_MS {
        return Err(ConfigError::Validation(format!(
            "latency_ms must be <= {}ms, got {}ms",
            MAX_LATENCY_MS, config.latency_ms
        )));
    }

    Ok(())
}

/// Validates fixture pages: every URL parses and no page is defined twice
fn validate_pages(pages: &[PageEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for page in pages {
        Url::parse(&page.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid page URL '{}': {}", page.url, e)))?;

        if !seen.insert(page.url.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Page '{}' is defined more than once",
                page.url
            )));
        }

        for link in &page.links {
            Url::parse(link).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid link '{}' on page '{}': {}",
                    link, page.url, e
                ))
            })?;
        }
    }

    Ok(())
}
