//! Canned fetcher serving pages from an in-memory map
//!
//! Stands in for a network fetcher: every fetch sleeps for a fixed latency and
//! then either returns the canned page or fails with `not found`.

use crate::config::{Config, PageEntry};
use crate::crawler::{FetchResult, Fetcher};
use crate::FetchError;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Failure modes of the fixture fetcher
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone)]
struct FixturePage {
    body: String,
    links: Vec<String>,
}

/// Fetcher backed by a fixed URL -> page map
#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, FixturePage>,
    latency: Duration,
}

impl FixtureFetcher {
    /// Creates an empty fixture with no latency
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated latency of every fetch
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Adds (or replaces) a page
    pub fn with_page<I, S>(mut self, url: impl Into<String>, body: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages.insert(
            url.into(),
            FixturePage {
                body: body.into(),
                links: links.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// The Go tour fixture: a small site with cycles and one missing page
    ///
    /// `https://golang.org/cmd/` is linked from two pages but has no entry, so
    /// fetching it fails.
    pub fn golang_tour() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                ["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                [
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    /// Builds the fixture described by `config`
    ///
    /// Falls back to [`FixtureFetcher::golang_tour`] when the config defines no
    /// pages.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration holding the `[[page]]` entries and latency
    ///
    /// # Returns
    ///
    /// A fixture that sleeps `latency-ms` before answering every fetch
    pub fn from_config(config: &Config) -> Self {
        let base = if config.pages.is_empty() {
            Self::golang_tour()
        } else {
            config
                .pages
                .iter()
                .fold(Self::new(), |fixture, PageEntry { url, body, links }| {
                    fixture.with_page(url.as_str(), body.as_str(), links.iter().map(String::as_str))
                })
        };

        base.with_latency(Duration::from_millis(config.fetcher.latency_ms))
    }

    /// Number of canned pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if no pages are defined
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        tracing::debug!("Fetching: {} ...", url);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.pages.get(url) {
            Some(page) => Ok(FetchResult::new(page.body.clone(), page.links.clone())),
            None => Err(FetchError::new(url, FixtureError::NotFound(url.to_string()))),
        }
    }
}
