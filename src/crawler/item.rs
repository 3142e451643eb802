//! Game page extraction
//!
//! Loads a game page through the session and turns its markup into an
//! [`ItemRecord`]. Parsing never fails; every field has its own lookup rule
//! and falls back to the sentinel when the rule finds nothing. The CSS
//! classes below are the site's generated class names and change whenever
//! the site is redeployed; keep them all in this file.

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::crawler::links::ItemLink;
use crate::crawler::retry::{RetryError, RetryPolicy, RetryRunner};
use crate::output::{or_not_available, ItemRecord};
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::{Duration, Instant};

const RATING_BLOCK: &str = "div.css-16rvtsf";
const RATING_VALUE: &str = "div[style*='font-weight:900']";
const RATING_VOTES: &str = "div[style*='font-size:12px']";
const DEVELOPER: &str = ".css-exrwgm";
const DETAIL_ROW: &str = ".css-12hp3i5";
const DETAIL_VALUE: &str = ".css-16rvtsf";
const CLASSIFICATION_LINKS: &str = ".css-ez83vb a";
const CONTROLS_ITEMS: &str = ".css-4ydurg ul li";
const DESCRIPTION: &str = ".gameDescription_first p";
const VIDEO_PLAYER: &str = "article.yt-lite";

/// Embed endpoint used when the player has not been activated yet
const VIDEO_EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed/";

/// Loads game pages and extracts their records
pub struct ItemExtractor {
    session: Arc<BrowserSession>,
    retry: RetryRunner,
    policy: RetryPolicy,
    timeout_step: Duration,
}

impl ItemExtractor {
    pub fn new(session: Arc<BrowserSession>, retry: RetryRunner, config: &Config) -> Self {
        Self {
            session,
            retry,
            policy: RetryPolicy::fixed(
                config.retry.item_attempts,
                Duration::from_millis(config.retry.item_delay_ms),
            ),
            timeout_step: Duration::from_secs(config.retry.item_timeout_step_secs),
        }
    }

    /// Loads the page behind `link` and extracts its record
    ///
    /// Attempt k is bounded by `k * timeout_step`.
    ///
    /// # Returns
    ///
    /// * `Ok(ItemRecord)` - The page loaded; missing fields hold the sentinel
    ///   and the URL field is the followed link
    /// * `Err(CrawlError::ExtractionFailed)` - Every attempt failed
    /// * `Err(CrawlError::Cancelled)` - The run was cancelled
    pub async fn extract(&self, link: &ItemLink) -> crate::Result<ItemRecord> {
        let started = Instant::now();
        let session = &self.session;
        let url = link.url.as_str();
        let step = self.timeout_step;

        let html = self
            .retry
            .run(&self.policy, url, move |attempt| {
                session.load_page(url, step * attempt)
            })
            .await
            .map_err(|e| match e {
                RetryError::Cancelled => CrawlError::Cancelled,
                RetryError::Exhausted { last, .. } => CrawlError::ExtractionFailed {
                    url: url.to_string(),
                    source: last,
                },
            })?;

        let mut record = parse_item_page(
            &html,
            link.hover_media.as_deref(),
            link.thumbnail.as_deref(),
        );
        // The followed link is what later runs compare against.
        record.url = url.to_string();

        tracing::info!(
            url,
            name = %record.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Game extracted"
        );

        Ok(record)
    }
}

/// Parses a rendered game page into a record
///
/// `hover_media` and `thumbnail` come from the listing page probe and are
/// copied as-is. The URL field is the page's canonical link; it is left as
/// the sentinel when the page declares none. [`ItemExtractor::extract`]
/// replaces it with the link that was followed.
pub fn parse_item_page(html: &str, hover_media: Option<&str>, thumbnail: Option<&str>) -> ItemRecord {
    let document = Html::parse_document(html);

    let (rating, rating_votes) = extract_rating(&document);

    ItemRecord {
        name: or_not_available(first_text(&document, "h1")),
        url: or_not_available(first_attr(&document, "link[rel='canonical']", "href")),
        rating: or_not_available(rating),
        rating_votes: or_not_available(rating_votes),
        developer: or_not_available(first_text(&document, DEVELOPER)),
        release_date: or_not_available(labelled_value(&document, "Released:")),
        last_updated: or_not_available(labelled_value(&document, "Last Updated:")),
        technology: or_not_available(labelled_value(&document, "Technology:")),
        platforms: or_not_available(labelled_value(&document, "Platforms:")),
        classification: or_not_available(joined(&document, CLASSIFICATION_LINKS, " » ")),
        wiki_pages: or_not_available(extract_wiki_pages(&document)),
        iframe: or_not_available(first_attr(&document, "iframe", "src")),
        description: or_not_available(first_text(&document, DESCRIPTION)),
        features: or_not_available(extract_features(&document)),
        controls: or_not_available(joined(&document, CONTROLS_ITEMS, "\n")),
        faq: or_not_available(extract_faq(&document)),
        gameplay_video: or_not_available(extract_gameplay_video(&document)),
        hover_video: or_not_available(hover_media.map(str::to_string)),
        thumbnail_url: or_not_available(thumbnail.map(str::to_string)),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css)?;
    document.select(&selector).next().map(text_of)
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = selector(css)?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr(attr)
        .map(|value| value.trim().to_string())
}

/// Joins the text of every match, skipping blank ones
fn joined(document: &Html, css: &str, separator: &str) -> Option<String> {
    let selector = selector(css)?;
    let parts: Vec<String> = document
        .select(&selector)
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(separator))
}

/// Value cell of the first detail row whose text contains `label`
fn labelled_value(document: &Html, label: &str) -> Option<String> {
    let row = selector(DETAIL_ROW)?;
    let value = selector(DETAIL_VALUE)?;

    document
        .select(&row)
        .filter(|r| r.text().collect::<String>().contains(label))
        .find_map(|r| r.select(&value).next())
        .map(text_of)
}

fn extract_rating(document: &Html) -> (Option<String>, Option<String>) {
    let (Some(block), Some(value), Some(votes)) = (
        selector(RATING_BLOCK),
        selector(RATING_VALUE),
        selector(RATING_VOTES),
    ) else {
        return (None, None);
    };

    let rating = document
        .select(&block)
        .find_map(|b| b.select(&value).next())
        .map(text_of);

    let rating_votes = document
        .select(&block)
        .find_map(|b| b.select(&votes).next())
        .map(|element| clean_votes(&text_of(element)));

    (rating, rating_votes)
}

/// Strips the decoration around a vote count: `(1,234 votes)` becomes `1,234`
fn clean_votes(raw: &str) -> String {
    raw.replace(['(', ')'], "")
        .replace("votes", "")
        .replace("ratings", "")
        .trim()
        .to_string()
}

/// Link texts of every detail block holding external links, joined with ", "
fn extract_wiki_pages(document: &Html) -> Option<String> {
    let block = selector(RATING_BLOCK)?;
    let external = selector("a[target='_blank']")?;
    let anchor = selector("a")?;

    let names: Vec<String> = document
        .select(&block)
        .filter(|b| b.select(&external).next().is_some())
        .flat_map(|b| b.select(&anchor).map(text_of).collect::<Vec<_>>())
        .filter(|name| !name.is_empty())
        .collect();

    (!names.is_empty()).then(|| names.join(", "))
}

/// Next sibling that is an element, skipping text and comments
fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Items of the list right after the "Features" heading
fn extract_features(document: &Html) -> Option<String> {
    let heading = selector("h3")?;
    let item = selector("li")?;

    let list = document
        .select(&heading)
        .filter(|h| text_of(*h).contains("Features"))
        .find_map(|h| next_element(h).filter(|next| next.value().name() == "ul"))?;

    let features: Vec<String> = list.select(&item).map(text_of).collect();
    (!features.is_empty()).then(|| features.join("\n"))
}

/// Question and answer pairs under the "FAQ" heading
fn extract_faq(document: &Html) -> Option<String> {
    let heading = selector("h2")?;
    let question = selector("h3")?;

    let container = document
        .select(&heading)
        .filter(|h| text_of(*h).contains("FAQ"))
        .find_map(|h| next_element(h).filter(|next| next.value().name() == "div"))?;

    let items: Vec<String> = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|entry| entry.value().name() == "div")
        .map(|entry| {
            let q = entry.select(&question).next().map(text_of).unwrap_or_default();
            let a = entry
                .children()
                .filter_map(ElementRef::wrap)
                .find(|child| child.value().name() == "div")
                .map(text_of)
                .unwrap_or_default();
            format!("Q: {}\nA: {}", q, a)
        })
        .collect();

    (!items.is_empty()).then(|| items.join("\n\n"))
}

/// Embedded gameplay video of the page
///
/// An activated player carries an iframe; otherwise the video id is read
/// from the player's poster image, named `<id>_<variant>.jpg`.
fn extract_gameplay_video(document: &Html) -> Option<String> {
    let player_selector = selector(VIDEO_PLAYER)?;
    let iframe = selector("iframe")?;
    let player = document.select(&player_selector).next()?;

    if let Some(frame) = player.select(&iframe).next() {
        return frame.value().attr("src").map(str::to_string);
    }

    let style = player.value().attr("style")?;
    let video_id = poster_video_id(style)?;
    Some(format!("{}{}", VIDEO_EMBED_BASE, video_id))
}

fn poster_video_id(style: &str) -> Option<String> {
    let (_, rest) = style.split_once("background-image: url(")?;
    let (image_url, _) = rest.split_once(')')?;
    let image_url = image_url.trim_matches(|c| c == '"' || c == '\'');
    let file_name = image_url.rsplit('/').next()?;
    let id = file_name.split('_').next()?;
    (!id.is_empty()).then(|| id.to_string())
}
