//! Integration tests for the crawler
//!
//! These tests drive the full crawl cycle end-to-end against a scripted
//! in-memory browser. Time is paused, so retry backoffs and settle delays
//! complete instantly while keeping their ordering.

use async_trait::async_trait;
use game_catalog_crawler::browser::{BrowserDriver, BrowserError, BrowserResult};
use game_catalog_crawler::config::{Config, CrawlTarget};
use game_catalog_crawler::crawler::{scripts, Coordinator};
use game_catalog_crawler::output::{ITEM_COLUMNS, TAG_COLUMNS};
use game_catalog_crawler::state::TargetStatus;
use game_catalog_crawler::CrawlError;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const SITE: &str = "https://site.test";
const LISTING: &str = "https://site.test/t/tower-defense";
const END_MARKER: &str = "Oops, you've reached a dead end!";

fn game(slug: &str) -> String {
    format!("{SITE}/game/{slug}")
}

fn listing_page(n: u32) -> String {
    if n == 1 {
        LISTING.to_string()
    } else {
        format!("{LISTING}/{n}")
    }
}

#[derive(Clone, Default)]
struct FakePage {
    html: String,
    links: Vec<String>,
}

/// Scripted browser: every URL maps to fixed markup and item links
#[derive(Default)]
struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    broken_urls: HashSet<String>,
    broken_probes: HashSet<String>,
    cancel_on: Option<(String, CancellationToken)>,
    hover_delay: Duration,
    current: Mutex<String>,
    navigations: Mutex<Vec<String>>,
    discoveries: AtomicUsize,
    hovers_in_flight: AtomicUsize,
    peak_hovers: AtomicUsize,
}

impl FakeBrowser {
    fn new() -> Self {
        Self::default()
    }

    fn listing(mut self, page: u32, slugs: &[&str]) -> Self {
        self.pages.insert(
            listing_page(page),
            FakePage {
                html: format!("<html><body><h2>Page {page}</h2></body></html>"),
                links: slugs.iter().map(|slug| game(slug)).collect(),
            },
        );
        for slug in slugs {
            self.pages.entry(game(slug)).or_insert_with(|| FakePage {
                html: game_html(slug),
                links: vec![],
            });
        }
        self
    }

    fn last_listing(mut self, page: u32, slugs: &[&str]) -> Self {
        self = self.listing(page, slugs);
        if let Some(listing) = self.pages.get_mut(&listing_page(page)) {
            listing.html = format!("<html><body><div>{END_MARKER}</div></body></html>");
        }
        self
    }

    fn page(mut self, url: &str, html: &str, links: &[String]) -> Self {
        self.pages.insert(
            url.to_string(),
            FakePage {
                html: html.to_string(),
                links: links.to_vec(),
            },
        );
        self
    }

    fn broken(mut self, url: &str) -> Self {
        self.broken_urls.insert(url.to_string());
        self
    }

    fn broken_probe(mut self, url: &str) -> Self {
        self.broken_probes.insert(url.to_string());
        self
    }

    fn cancel_on_navigation(mut self, url: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((url.to_string(), token));
        self
    }

    fn slow_hover(mut self, delay: Duration) -> Self {
        self.hover_delay = delay;
        self
    }

    fn navigations_to(&self, prefix: &str) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn current_page(&self) -> FakePage {
        let current = self.current.lock().unwrap().clone();
        self.pages.get(&current).cloned().unwrap_or(FakePage {
            html: "<html><body></body></html>".to_string(),
            links: vec![],
        })
    }
}

fn game_html(slug: &str) -> String {
    format!(
        r#"<html><head><link rel="canonical" href="{url}"></head>
        <body><h1>{name}</h1><div class="css-exrwgm">Studio {name}</div></body></html>"#,
        url = game(slug),
        name = slug.to_uppercase(),
    )
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.navigations.lock().unwrap().push(url.to_string());

        if let Some((trigger, token)) = &self.cancel_on {
            if trigger == url {
                token.cancel();
            }
        }

        if self.broken_urls.contains(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }

        *self.current.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn wait_visible(&self, _selector: &str, _timeout: Duration) -> BrowserResult<()> {
        Ok(())
    }

    async fn evaluate(&self, function: &str, args: Vec<Value>) -> BrowserResult<Value> {
        let link = args.first().and_then(Value::as_str).unwrap_or_default();

        if function == scripts::DISCOVER_LINKS {
            self.discoveries.fetch_add(1, Ordering::SeqCst);
            return Ok(json!(self.current_page().links));
        }

        if function == scripts::HOVER_LINK {
            if self.broken_probes.contains(link) {
                return Err(BrowserError::Evaluation("anchor not found".to_string()));
            }
            let in_flight = self.hovers_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_hovers.fetch_max(in_flight, Ordering::SeqCst);
            if !self.hover_delay.is_zero() {
                tokio::time::sleep(self.hover_delay).await;
            }
            self.hovers_in_flight.fetch_sub(1, Ordering::SeqCst);
            return Ok(json!(true));
        }

        if function == scripts::THUMBNAIL_SOURCES {
            let slug = link.rsplit('/').next().unwrap_or_default();
            return Ok(json!({
                "image": format!("https://img.test/{slug}.jpg"),
                "video": format!("https://video.test/{slug}-landscape-preview.mp4"),
            }));
        }

        if function == scripts::HOVER_MEDIA {
            let slug = link.rsplit('/').next().unwrap_or_default();
            return Ok(json!([
                format!("https://video.test/{slug}-portrait.mp4"),
                format!("https://video.test/{slug}-landscape-preview.mp4"),
            ]));
        }

        Ok(Value::Null)
    }

    async fn outer_html(&self) -> BrowserResult<String> {
        Ok(self.current_page().html)
    }
}

fn test_config(dir: &TempDir, targets: Vec<CrawlTarget>) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = SITE.to_string();
    config.crawler.tags_url = format!("{SITE}/tags");
    config.crawler.thumbnail_cdn = "https://imgs.test".to_string();
    config.crawler.max_concurrent_probes = 1;
    config.output.items_path = path_string(&dir.path().join("games.csv"));
    config.output.tags_path = path_string(&dir.path().join("tags.csv"));
    config.targets = targets;
    config
}

fn paginated(url: &str) -> CrawlTarget {
    CrawlTarget {
        url: url.to_string(),
        paginate: true,
    }
}

fn single(url: &str) -> CrawlTarget {
    CrawlTarget {
        url: url.to_string(),
        paginate: false,
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn read_rows(path: &str) -> Vec<Vec<String>> {
    if !Path::new(path).exists() {
        return vec![];
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// URLs of the data rows of the items file
fn written_urls(config: &Config) -> Vec<String> {
    read_rows(&config.output.items_path)
        .into_iter()
        .skip(1)
        .map(|row| row[1].clone())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_three_links_then_empty_page() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(FakeBrowser::new().listing(1, &["alpha", "beta", "gamma"]));

    let mut coordinator =
        Coordinator::new(config.clone(), browser.clone(), CancellationToken::new()).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(
        browser.navigations_to(LISTING),
        vec![listing_page(1), listing_page(2)]
    );
    // One discovery on page 1, two on the empty page 2.
    assert_eq!(browser.discoveries.load(Ordering::SeqCst), 3);

    let rows = read_rows(&config.output.items_path);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], ITEM_COLUMNS.to_vec());
    assert_eq!(
        written_urls(&config),
        vec![game("alpha"), game("beta"), game("gamma")]
    );

    let outcome = &summary.targets[0];
    assert_eq!(outcome.status, TargetStatus::Completed);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records_written, 3);
    assert_eq!(outcome.last_page, Some(1));
    assert!(!summary.cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_record_fields_from_probe_and_page() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(FakeBrowser::new().listing(1, &["alpha"]));

    Coordinator::new(config.clone(), browser, CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = read_rows(&config.output.items_path);
    let row = &rows[1];
    assert_eq!(row[0], "ALPHA");
    assert_eq!(row[1], game("alpha"));
    assert_eq!(row[4], "Studio ALPHA");
    assert_eq!(row[2], "N/A");
    assert_eq!(
        row[17],
        "https://video.test/alpha-portrait.mp4, https://video.test/alpha-landscape-preview.mp4"
    );
    assert!(row[18].starts_with("https://imgs.test/alpha_16x9/alpha_16x9-cover?"));
}

#[tokio::test(start_paused = true)]
async fn test_end_marker_on_first_page() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .last_listing(1, &["alpha", "beta"])
            .listing(2, &["never"]),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(browser.navigations_to(LISTING), vec![listing_page(1)]);
    assert_eq!(written_urls(&config), vec![game("alpha"), game("beta")]);
    assert_eq!(summary.targets[0].last_page, Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_double_empty_first_page() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(FakeBrowser::new().listing(1, &[]));

    let started = tokio::time::Instant::now();
    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(browser.navigations_to(LISTING), vec![listing_page(1)]);
    assert_eq!(browser.discoveries.load(Ordering::SeqCst), 2);
    assert!(written_urls(&config).is_empty());
    assert_eq!(summary.targets[0].last_page, Some(0));
    assert_eq!(summary.targets[0].pages_fetched, 1);
    assert!(started.elapsed() >= config.crawler.empty_page_settle());
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_after_first_page() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING), paginated(format!("{SITE}/new").as_str())]);
    let token = CancellationToken::new();
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha", "beta"])
            .listing(2, &["gamma"])
            .cancel_on_navigation(&game("beta"), token.clone()),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), token)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(browser.navigations_to(LISTING), vec![listing_page(1)]);
    assert!(browser.navigations_to(&format!("{SITE}/new")).is_empty());
    assert!(browser.navigations_to(&format!("{SITE}/tags")).is_empty());
    assert_eq!(written_urls(&config), vec![game("alpha"), game("beta")]);

    assert!(summary.cancelled);
    assert_eq!(summary.targets.len(), 1);
    assert_eq!(summary.targets[0].status, TargetStatus::Cancelled);
    assert_eq!(summary.tag_groups, None);
}

#[tokio::test(start_paused = true)]
async fn test_failed_item_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha", "beta", "gamma"])
            .broken(&game("beta")),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(written_urls(&config), vec![game("alpha"), game("gamma")]);
    assert_eq!(browser.navigations_to(&game("beta")).len(), 3);
    assert_eq!(summary.targets[0].status, TargetStatus::Completed);
    assert_eq!(summary.targets[0].records_written, 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_probe_drops_link() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha", "beta"])
            .broken_probe(&game("alpha")),
    );

    Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(written_urls(&config), vec![game("beta")]);
    assert!(browser.navigations_to(&game("alpha")).is_empty());
    // A page whose probes fail is not mistaken for the end of the listing.
    assert_eq!(
        browser.navigations_to(LISTING),
        vec![listing_page(1), listing_page(2)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_paginated_target_does_not_stop_run() {
    let dir = TempDir::new().unwrap();
    let broken_listing = format!("{SITE}/t/broken");
    let config = test_config(&dir, vec![paginated(&broken_listing), paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha"])
            .broken(&broken_listing),
    );

    let started = tokio::time::Instant::now();
    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(browser.navigations_to(&broken_listing).len(), 5);
    // 2 + 4 + 8 + 16 seconds of backoff before giving up.
    assert!(started.elapsed() >= Duration::from_secs(30));

    assert_eq!(summary.targets[0].status, TargetStatus::Failed);
    assert_eq!(summary.targets[0].last_page, Some(0));
    assert_eq!(summary.targets[1].status, TargetStatus::Completed);
    assert_eq!(written_urls(&config), vec![game("alpha")]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_single_page_target_fails_fast() {
    let dir = TempDir::new().unwrap();
    let broken_home = format!("{SITE}/home");
    let config = test_config(&dir, vec![single(&broken_home), paginated(LISTING)]);
    let browser = Arc::new(FakeBrowser::new().listing(1, &["alpha"]).broken(&broken_home));

    let result = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await;

    assert!(matches!(
        result,
        Err(CrawlError::PageLoadFailed { attempts: 5, .. })
    ));
    assert!(browser.navigations_to(LISTING).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_single_page_target_without_fail_fast() {
    let dir = TempDir::new().unwrap();
    let broken_home = format!("{SITE}/home");
    let mut config = test_config(&dir, vec![single(&broken_home), paginated(LISTING)]);
    config.crawler.fail_fast = false;
    let browser = Arc::new(FakeBrowser::new().listing(1, &["alpha"]).broken(&broken_home));

    let summary = Coordinator::new(config.clone(), browser, CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.targets[0].status, TargetStatus::Failed);
    assert_eq!(summary.targets[1].status, TargetStatus::Completed);
    assert_eq!(written_urls(&config), vec![game("alpha")]);
}

#[tokio::test(start_paused = true)]
async fn test_single_page_target_loads_once() {
    let dir = TempDir::new().unwrap();
    let home = format!("{SITE}/home");
    let config = test_config(&dir, vec![single(&home)]);
    let browser = Arc::new(FakeBrowser::new().page(&home, "<html><body>home</body></html>", &[game("alpha")]));

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(browser.navigations_to(&home), vec![home.clone()]);
    assert_eq!(browser.discoveries.load(Ordering::SeqCst), 0);
    assert_eq!(summary.targets[0].pages_fetched, 1);
    assert!(written_urls(&config).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_probes_run_concurrently_up_to_cap() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, vec![paginated(LISTING)]);
    config.crawler.max_concurrent_probes = 3;

    let slugs = [
        "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
    ];
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &slugs)
            .slow_hover(Duration::from_secs(1)),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    let peak = browser.peak_hovers.load(Ordering::SeqCst);
    assert!(peak > 1, "hovers never overlapped");
    assert!(peak <= 3, "{peak} hovers in flight with a cap of 3");

    let written: HashSet<String> = written_urls(&config).into_iter().collect();
    let expected: HashSet<String> = slugs.iter().map(|slug| game(slug)).collect();
    assert_eq!(written, expected);
    assert_eq!(summary.targets[0].records_written, 8);
}

#[tokio::test(start_paused = true)]
async fn test_skip_existing_when_canonical_differs_from_link() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, vec![paginated(LISTING)]);
    config.output.skip_existing = true;

    // The game page declares a canonical URL without the tracking query.
    let tracked = format!("{}?from=listing", game("alpha"));
    let site = || {
        FakeBrowser::new()
            .page(LISTING, "<html><body>listing</body></html>", &[tracked.clone()])
            .page(&tracked, &game_html("alpha"), &[])
    };

    let first = Arc::new(site());
    Coordinator::new(config.clone(), first, CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(written_urls(&config), vec![tracked.clone()]);

    let second = Arc::new(site());
    Coordinator::new(config.clone(), second.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(second.navigations_to(&tracked).is_empty());
    assert_eq!(written_urls(&config), vec![tracked]);
}

#[tokio::test(start_paused = true)]
async fn test_item_shared_by_targets_written_once() {
    let dir = TempDir::new().unwrap();
    let other = format!("{SITE}/t/strategy");
    let config = test_config(&dir, vec![paginated(LISTING), paginated(&other)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha", "beta"])
            .page(&other, "<html><body>strategy</body></html>", &[game("beta"), game("gamma")])
            .page(&game("gamma"), &game_html("gamma"), &[]),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        written_urls(&config),
        vec![game("alpha"), game("beta"), game("gamma")]
    );
    assert_eq!(browser.navigations_to(&game("beta")).len(), 1);
    assert_eq!(summary.total_records(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_skip_existing_items() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, vec![paginated(LISTING)]);
    config.output.skip_existing = true;

    let first = Arc::new(FakeBrowser::new().listing(1, &["alpha"]));
    Coordinator::new(config.clone(), first, CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    let second = Arc::new(FakeBrowser::new().listing(1, &["alpha", "beta"]));
    Coordinator::new(config.clone(), second.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(second.navigations_to(&game("alpha")).is_empty());
    assert_eq!(written_urls(&config), vec![game("alpha"), game("beta")]);
    assert_eq!(read_rows(&config.output.items_path).len(), 3);
}

const TAGS_PAGE: &str = r#"<html><body>
    <h2 class="css-9oxgqm">Genres</h2>
    <div>
        <a href="/t/action"><div class="css-wy93c2"><p>Action</p><span>1,204</span></div></a>
        <a href="/t/puzzle"><div class="css-wy93c2"><p>Puzzle</p><span>873</span></div></a>
    </div>
    <h2 class="css-9oxgqm">Controls</h2>
    <div>
        <a href="/t/mouse"><div class="css-wy93c2"><p>Mouse</p><span>2,001</span></div></a>
    </div>
</body></html>"#;

#[tokio::test(start_paused = true)]
async fn test_tag_pass_after_targets() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha"])
            .page(&format!("{SITE}/tags"), TAGS_PAGE, &[]),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.tag_groups, Some(2));

    let navigations = browser.navigations.lock().unwrap().clone();
    assert_eq!(navigations.last(), Some(&format!("{SITE}/tags")));

    let rows = read_rows(&config.output.tags_path);
    assert_eq!(rows[0], TAG_COLUMNS.to_vec());
    assert_eq!(
        rows[1],
        vec!["Genres", "Action", "1,204", "https://site.test/t/action"]
    );
    assert_eq!(rows[3], vec!["Controls", "Mouse", "2,001", "https://site.test/t/mouse"]);
    assert_eq!(rows.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_tag_pass_failure_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha"])
            .broken(&format!("{SITE}/tags")),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.tag_groups, None);
    // Single attempt, no retries.
    assert_eq!(browser.navigations_to(&format!("{SITE}/tags")).len(), 1);
    assert_eq!(written_urls(&config), vec![game("alpha")]);
}

#[tokio::test(start_paused = true)]
async fn test_tags_only_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(
        FakeBrowser::new()
            .listing(1, &["alpha"])
            .page(&format!("{SITE}/tags"), TAGS_PAGE, &[]),
    );

    let summary = Coordinator::new(config.clone(), browser.clone(), CancellationToken::new())
        .unwrap()
        .run_tags_only()
        .await
        .unwrap();

    assert_eq!(summary.tag_groups, Some(2));
    assert!(browser.navigations_to(LISTING).is_empty());
    assert_eq!(read_rows(&config.output.tags_path).len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_tags_only_failure_is_returned() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, vec![paginated(LISTING)]);
    let browser = Arc::new(FakeBrowser::new().broken(&format!("{SITE}/tags")));

    let result = Coordinator::new(config, browser, CancellationToken::new())
        .unwrap()
        .run_tags_only()
        .await;

    assert!(matches!(result, Err(CrawlError::Browser(_))));
}
