//! Item link discovery and hover enrichment on a listing page
//!
//! Discovery reads every item link of the listing page currently loaded in
//! the session. Each link is then probed: hovered so the site swaps in its
//! preview video, and read back for the preview sources and a thumbnail.
//! Probes run concurrently, bounded by `max-concurrent-probes`.

use crate::browser::{BrowserError, BrowserResult, BrowserSession};
use crate::config::Config;
use crate::crawler::retry::{RetryError, RetryPolicy, RetryRunner};
use crate::crawler::scripts;
use crate::url::{dedup_preserving_order, is_item_url};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Query string the image CDN expects for cover thumbnails
const COVER_QUERY: &str = "auto=format%2Ccompress&q=90&cs=strip&w=273&fit=crop";

/// Marker that follows the game slug in preview video filenames
const LANDSCAPE_MARKER: &str = "-landscape-";

/// A discovered item link plus the media found by hovering it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLink {
    pub url: String,

    /// Every preview video source, joined with ", "
    pub hover_media: Option<String>,

    pub thumbnail: Option<String>,
}

/// Result of one extraction pass over a listing page
///
/// `discovered` counts distinct links found before probing. A page whose
/// probes all failed still has a non-zero `discovered` and is not treated
/// as the end of the listing.
#[derive(Debug, Clone, Default)]
pub struct LinkBatch {
    pub discovered: usize,
    pub links: Vec<ItemLink>,
}

impl LinkBatch {
    pub fn is_empty(&self) -> bool {
        self.discovered == 0
    }
}

#[derive(Debug, Deserialize)]
struct ThumbnailSources {
    image: Option<String>,
    video: Option<String>,
}

/// Discovers and enriches item links on the loaded listing page
pub struct LinkExtractor {
    session: Arc<BrowserSession>,
    retry: RetryRunner,
    item_pattern: String,
    max_concurrent_probes: usize,
    hover_settle: Duration,
    probe_policy: RetryPolicy,
    probe_timeout_step: Duration,
    thumbnail_cdn: String,
}

impl LinkExtractor {
    pub fn new(session: Arc<BrowserSession>, retry: RetryRunner, config: &Config) -> Self {
        Self {
            session,
            retry,
            item_pattern: config.crawler.item_url_pattern.clone(),
            max_concurrent_probes: config.crawler.max_concurrent_probes.max(1),
            hover_settle: config.crawler.hover_settle(),
            probe_policy: RetryPolicy::fixed(
                config.retry.probe_attempts,
                Duration::from_millis(config.retry.probe_delay_ms),
            ),
            probe_timeout_step: Duration::from_secs(config.retry.probe_timeout_step_secs),
            thumbnail_cdn: config.crawler.thumbnail_cdn.clone(),
        }
    }

    /// Returns the distinct item links of the loaded page, in DOM order
    pub async fn discover_links(&self) -> BrowserResult<Vec<String>> {
        let hrefs: Vec<String> = self
            .session
            .evaluate_as(
                scripts::DISCOVER_LINKS,
                vec![Value::from(self.item_pattern.as_str())],
            )
            .await?;

        let links = dedup_preserving_order(
            hrefs
                .into_iter()
                .filter(|href| is_item_url(href, &self.item_pattern)),
        );

        tracing::debug!(count = links.len(), "Item links discovered");
        Ok(links)
    }

    /// Discovers the page's item links and probes each of them
    ///
    /// Links whose probe exhausts its retries are logged and dropped. The
    /// returned links are in probe completion order.
    pub async fn extract_links(&self) -> BrowserResult<LinkBatch> {
        let started = Instant::now();
        let urls = self.discover_links().await?;

        if urls.is_empty() {
            tracing::info!("No item links found on page");
            return Ok(LinkBatch::default());
        }

        let discovered = urls.len();
        tracing::info!(
            discovered,
            concurrency = self.max_concurrent_probes,
            "Probing item links"
        );

        let links: Vec<ItemLink> = stream::iter(urls)
            .map(|url| self.probe(url))
            .buffer_unordered(self.max_concurrent_probes)
            .filter_map(|link| async move { link })
            .collect()
            .await;

        tracing::info!(
            discovered,
            enriched = links.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Link extraction finished"
        );

        Ok(LinkBatch { discovered, links })
    }

    /// Probes one link under the probe retry policy
    async fn probe(&self, url: String) -> Option<ItemLink> {
        let link = url.as_str();
        let step = self.probe_timeout_step;

        let result = self
            .retry
            .run(&self.probe_policy, link, move |attempt| async move {
                let timeout = step * attempt;
                match tokio::time::timeout(timeout, self.probe_once(link)).await {
                    Ok(result) => result,
                    Err(_) => Err(BrowserError::Timeout {
                        waiting_for: format!("hover preview of {}", link),
                        timeout,
                    }),
                }
            })
            .await;

        match result {
            Ok(item) => Some(item),
            Err(RetryError::Cancelled) => None,
            Err(RetryError::Exhausted { attempts, last }) => {
                tracing::warn!(url = link, attempts, "Dropping link, probe failed: {}", last);
                None
            }
        }
    }

    async fn probe_once(&self, link: &str) -> BrowserResult<ItemLink> {
        self.session
            .evaluate(scripts::HOVER_LINK, vec![Value::from(link)])
            .await?;

        tokio::time::sleep(self.hover_settle).await;

        let sources: ThumbnailSources = self
            .session
            .evaluate_as(scripts::THUMBNAIL_SOURCES, vec![Value::from(link)])
            .await?;
        let media: Vec<String> = self
            .session
            .evaluate_as(scripts::HOVER_MEDIA, vec![Value::from(link)])
            .await?;

        let thumbnail = sources
            .video
            .as_deref()
            .and_then(|video| derive_cover_url(video, &self.thumbnail_cdn))
            .or_else(|| sources.image.filter(|image| !image.trim().is_empty()));

        let hover_media = if media.is_empty() {
            None
        } else {
            Some(media.join(", "))
        };

        tracing::debug!(
            url = link,
            has_thumbnail = thumbnail.is_some(),
            has_hover_media = hover_media.is_some(),
            "Link probed"
        );

        Ok(ItemLink {
            url: link.to_string(),
            hover_media,
            thumbnail,
        })
    }
}

/// Builds the cover thumbnail URL for a preview video
///
/// Preview videos are named `<slug>-landscape-<suffix>`; the cover lives at
/// `<cdn>/<slug>_16x9/<slug>_16x9-cover`. Returns None when the filename
/// does not follow that pattern.
///
/// # Examples
///
/// ```
/// use game_catalog_crawler::crawler::derive_cover_url;
///
/// let cover = derive_cover_url(
///     "https://videos.example.com/tower-siege-landscape-video.mp4",
///     "https://imgs.example.com",
/// );
/// assert_eq!(
///     cover.as_deref(),
///     Some("https://imgs.example.com/tower-siege_16x9/tower-siege_16x9-cover?auto=format%2Ccompress&q=90&cs=strip&w=273&fit=crop")
/// );
/// ```
pub fn derive_cover_url(video_src: &str, cdn: &str) -> Option<String> {
    let slug = video_src.split('/').skip(1).find_map(|segment| {
        let end = segment.rfind(LANDSCAPE_MARKER)?;
        (end > 0).then(|| &segment[..end])
    })?;

    Some(format!(
        "{cdn}/{slug}_16x9/{slug}_16x9-cover?{COVER_QUERY}",
        cdn = cdn.trim_end_matches('/'),
    ))
}
