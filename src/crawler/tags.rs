//! Tag listing extraction

use crate::browser::BrowserSession;
use crate::output::TagEntry;
use crate::output::TagGroup;
use crate::url::{parse_http_url, resolve_href};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const GROUP_HEADING: &str = "h2.css-9oxgqm";
const TAG_TILE: &str = "div.css-wy93c2";

/// Reads the grouped tag listing page
pub struct TagExtractor {
    session: Arc<BrowserSession>,
    timeout: Duration,
}

impl TagExtractor {
    pub fn new(session: Arc<BrowserSession>, timeout: Duration) -> Self {
        Self { session, timeout }
    }

    /// Loads the tags page once, without retries, and parses its groups
    pub async fn extract_tags(&self, url: &str) -> crate::Result<Vec<TagGroup>> {
        let base = parse_http_url(url)?;
        let started = Instant::now();

        tracing::info!(url, "Extracting tags");
        let html = self.session.load_page(url, self.timeout).await?;
        let groups = parse_tag_groups(&html, &base);

        tracing::info!(
            url,
            groups = groups.len(),
            tags = groups.iter().map(|g| g.tags.len()).sum::<usize>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tags extracted"
        );

        Ok(groups)
    }
}

/// Parses every tag group on the tags page
///
/// A group is a heading followed by sibling blocks holding tag tiles, up to
/// the next heading. Each tile's link is resolved against `base`; a tile
/// without a usable link gets an empty URL.
pub fn parse_tag_groups(html: &str, base: &Url) -> Vec<TagGroup> {
    let (Ok(heading), Ok(tile), Ok(name), Ok(count)) = (
        Selector::parse(GROUP_HEADING),
        Selector::parse(TAG_TILE),
        Selector::parse("p"),
        Selector::parse("span"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&heading)
        .map(|h| {
            let tags = h
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .take_while(|sibling| !heading.matches(sibling))
                .flat_map(|sibling| sibling.select(&tile).collect::<Vec<_>>())
                .map(|tile| TagEntry {
                    name: first_text(tile, &name),
                    count: first_text(tile, &count),
                    url: tile
                        .parent()
                        .and_then(ElementRef::wrap)
                        .and_then(|parent| parent.value().attr("href"))
                        .and_then(|href| resolve_href(href, base))
                        .unwrap_or_default(),
                })
                .collect();

            TagGroup {
                group: text_of(h),
                tags,
            }
        })
        .collect()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(text_of)
        .unwrap_or_default()
}
