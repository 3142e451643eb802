use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the crawler
///
/// Every table and key is optional; missing values fall back to the
/// defaults the crawler was tuned with against the live site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
    #[serde(rename = "target")]
    pub targets: Vec<CrawlTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            crawler: CrawlerConfig::default(),
            retry: RetryConfig::default(),
            output: OutputConfig::default(),
            targets: vec![CrawlTarget {
                url: "https://www.crazygames.com/t/tower-defense".to_string(),
                paginate: true,
            }],
        }
    }
}

/// Headless browser settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run Chrome without a window
    pub headless: bool,

    /// User agent presented to the target site
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Selector that must become visible before a page counts as loaded
    #[serde(rename = "ready-selector")]
    pub ready_selector: String,

    /// Extra command line switches passed to Chrome
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            ready_selector: "body".to_string(),
            args: vec![
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
        }
    }
}

/// Crawl behaviour configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Site root, used to resolve relative links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Page listing every tag group
    #[serde(rename = "tags-url")]
    pub tags_url: String,

    /// Image CDN used to build cover thumbnails from preview video names
    #[serde(rename = "thumbnail-cdn")]
    pub thumbnail_cdn: String,

    /// Substring every item link contains
    #[serde(rename = "item-url-pattern")]
    pub item_url_pattern: String,

    /// Text shown on the page past the last listing page
    #[serde(rename = "end-marker")]
    pub end_marker: String,

    /// Upper bound on concurrent hover probes per listing page
    #[serde(rename = "max-concurrent-probes")]
    pub max_concurrent_probes: usize,

    /// Pause between two item extractions (milliseconds)
    #[serde(rename = "item-pause-ms")]
    pub item_pause_ms: u64,

    /// Extra wait before concluding a listing page is empty (milliseconds)
    #[serde(rename = "empty-page-settle-ms")]
    pub empty_page_settle_ms: u64,

    /// Wait after hovering a link before reading its preview (milliseconds)
    #[serde(rename = "hover-settle-ms")]
    pub hover_settle_ms: u64,

    /// Timeout for the single tag page load (seconds)
    #[serde(rename = "tags-timeout-secs")]
    pub tags_timeout_secs: u64,

    /// Deadline for the whole run (seconds)
    #[serde(rename = "run-deadline-secs")]
    pub run_deadline_secs: u64,

    /// Abort the run when a non-paginated target cannot be loaded
    #[serde(rename = "fail-fast")]
    pub fail_fast: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.crazygames.com".to_string(),
            tags_url: "https://www.crazygames.com/tags".to_string(),
            thumbnail_cdn: "https://imgs.crazygames.com".to_string(),
            item_url_pattern: "/game/".to_string(),
            end_marker: "Oops, you've reached a dead end!".to_string(),
            max_concurrent_probes: 8,
            item_pause_ms: 1_000,
            empty_page_settle_ms: 5_000,
            hover_settle_ms: 3_000,
            tags_timeout_secs: 120,
            run_deadline_secs: 48 * 60 * 60,
            fail_fast: true,
        }
    }
}

impl CrawlerConfig {
    pub fn item_pause(&self) -> Duration {
        Duration::from_millis(self.item_pause_ms)
    }

    pub fn empty_page_settle(&self) -> Duration {
        Duration::from_millis(self.empty_page_settle_ms)
    }

    pub fn hover_settle(&self) -> Duration {
        Duration::from_millis(self.hover_settle_ms)
    }

    pub fn tags_timeout(&self) -> Duration {
        Duration::from_secs(self.tags_timeout_secs)
    }

    pub fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_secs)
    }
}

/// Retry budgets for the three retried operations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts for a listing page load
    #[serde(rename = "page-attempts")]
    pub page_attempts: u32,

    /// First backoff delay for listing pages; doubles on every retry (milliseconds)
    #[serde(rename = "page-base-delay-ms")]
    pub page_base_delay_ms: u64,

    /// Per-attempt timeout for a paginated listing page (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Per-attempt timeout for a non-paginated page (seconds)
    #[serde(rename = "single-page-timeout-secs")]
    pub single_page_timeout_secs: u64,

    /// Attempts for an item page load
    #[serde(rename = "item-attempts")]
    pub item_attempts: u32,

    /// Fixed pause between item attempts (milliseconds)
    #[serde(rename = "item-delay-ms")]
    pub item_delay_ms: u64,

    /// Item timeout grows by this much per attempt (seconds)
    #[serde(rename = "item-timeout-step-secs")]
    pub item_timeout_step_secs: u64,

    /// Attempts for a hover probe
    #[serde(rename = "probe-attempts")]
    pub probe_attempts: u32,

    /// Fixed pause between probe attempts (milliseconds)
    #[serde(rename = "probe-delay-ms")]
    pub probe_delay_ms: u64,

    /// Probe timeout grows by this much per attempt (seconds)
    #[serde(rename = "probe-timeout-step-secs")]
    pub probe_timeout_step_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            page_attempts: 5,
            page_base_delay_ms: 2_000,
            page_timeout_secs: 120,
            single_page_timeout_secs: 30,
            item_attempts: 3,
            item_delay_ms: 5_000,
            item_timeout_step_secs: 60,
            probe_attempts: 3,
            probe_delay_ms: 5_000,
            probe_timeout_step_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the items CSV file
    #[serde(rename = "items-path")]
    pub items_path: String,

    /// Path to the tags CSV file
    #[serde(rename = "tags-path")]
    pub tags_path: String,

    /// Skip links whose URL is already present in the items file
    #[serde(rename = "skip-existing")]
    pub skip_existing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            items_path: "games.csv".to_string(),
            tags_path: "tags.csv".to_string(),
            skip_existing: false,
        }
    }
}

/// A listing URL to crawl
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrawlTarget {
    /// Listing URL; page n > 1 lives at `<url>/<n>`
    pub url: String,

    /// Walk the listing's pages and extract every game on them
    #[serde(default)]
    pub paginate: bool,
}
