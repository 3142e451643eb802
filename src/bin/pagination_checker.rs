//! Pagination checker
//!
//! Walks the pages of one listing and reports how many distinct game links
//! each page holds. Nothing is extracted or written; this is a quick way to
//! see how deep a listing goes before pointing the crawler at it.

use anyhow::{Context, Result};
use clap::Parser;
use game_catalog_crawler::browser::{BrowserSession, ChromeDriver};
use game_catalog_crawler::config::{validate, Config, CrawlTarget};
use game_catalog_crawler::crawler::{LinkExtractor, RetryRunner};
use game_catalog_crawler::url::page_url;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Check how many pages a game listing has
#[derive(Parser, Debug)]
#[command(name = "pagination-checker")]
#[command(version = "1.0.0")]
#[command(about = "Counts the game links on each page of a listing", long_about = None)]
struct Cli {
    /// Listing URL to check
    #[arg(long)]
    url: String,

    /// Maximum number of pages to check
    #[arg(long, default_value_t = 10)]
    max_pages: u32,
}

/// Totals of a pagination check
#[derive(Debug, Default, PartialEq)]
struct CheckReport {
    pages: u32,
    games: usize,
}

impl CheckReport {
    fn average(&self) -> f64 {
        if self.pages == 0 {
            0.0
        } else {
            self.games as f64 / f64::from(self.pages)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("game_catalog_crawler=info,pagination_checker=info,warn"))
        .with_target(false)
        .init();

    let mut config = Config::default();
    config.targets = vec![CrawlTarget {
        url: cli.url.clone(),
        paginate: true,
    }];
    validate(&config).context("invalid listing URL")?;

    let driver = Arc::new(
        ChromeDriver::launch(&config.browser)
            .await
            .context("failed to launch browser")?,
    );

    // A page counts as loaded once a game link is on screen.
    let ready_selector = format!("a[href*=\"{}\"]", config.crawler.item_url_pattern);
    let session = Arc::new(BrowserSession::new(driver, ready_selector));
    let retry = RetryRunner::new(CancellationToken::new());
    let links = LinkExtractor::new(session.clone(), retry.clone(), &config);

    tracing::info!(url = %cli.url, max_pages = cli.max_pages, "Starting pagination check");

    let report = tokio::select! {
        report = check_pages(&cli, &config, &session, &links, &retry) => report?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received interrupt signal, stopping");
            return Ok(());
        }
    };

    println!("Pagination check complete:");
    println!("  Total pages: {}", report.pages);
    println!("  Total games: {}", report.games);
    println!("  Average games per page: {:.2}", report.average());

    Ok(())
}

async fn check_pages(
    cli: &Cli,
    config: &Config,
    session: &BrowserSession,
    links: &LinkExtractor,
    retry: &RetryRunner,
) -> Result<CheckReport> {
    let timeout = Duration::from_secs(config.retry.single_page_timeout_secs);
    let mut report = CheckReport::default();

    for page in 1..=cli.max_pages {
        let url = page_url(&cli.url, page)?;
        tracing::info!(page, url = %url, "Checking page");

        if let Err(e) = session.load_page(url.as_str(), timeout).await {
            tracing::warn!(page, "Failed to load page: {}", e);
            break;
        }

        let mut found = links.discover_links().await.unwrap_or_default();
        if found.is_empty() {
            retry.pause(config.crawler.empty_page_settle()).await;
            found = links.discover_links().await.unwrap_or_default();
        }

        if found.is_empty() {
            tracing::info!(
                page,
                last_page = page - 1,
                "No games found after retry, listing ends"
            );
            break;
        }

        report.pages = page;
        report.games += found.len();
        tracing::info!(page, unique = found.len(), total = report.games, "Page checked");

        if page == cli.max_pages {
            tracing::info!(max_pages = cli.max_pages, "Reached maximum configured pages");
        }
    }

    Ok(report)
}
