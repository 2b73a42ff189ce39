//! Fanout-Crawler main entry point
//!
//! This is the command-line interface for the Fanout-Crawler graph crawler.

use anyhow::Context;
use clap::Parser;
use fanout_crawler::config::{load_config_with_hash, Config};
use fanout_crawler::crawler::crawl;
use fanout_crawler::output::{print_statistics, StdoutSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fanout-Crawler: a concurrent, depth-bounded crawler
///
/// Explores every page reachable from the configured root, fetching each page
/// at most once and following every link concurrently. Without a config file
/// the built-in Go tour fixture is crawled.
#[derive(Parser, Debug)]
#[command(name = "fanout-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent, depth-bounded crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration given, crawling the built-in fixture");
            Config::default()
        }
    };

    println!("Starting from {}", config.crawler.root);

    let report = crawl(&config, StdoutSink)
        .await
        .with_context(|| format!("crawl from {} failed", config.crawler.root))?;

    if !cli.quiet {
        print_statistics(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fanout_crawler=info,warn"),
            1 => EnvFilter::new("fanout_crawler=debug,info"),
            2 => EnvFilter::new("fanout_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
