//! Per-target crawl driver
//!
//! A paginated target is walked as a state machine over
//! [`PaginationState`]: load page n, extract its items, advance to n + 1.
//! The walk ends when a page has no item links (after one settle retry),
//! when a page shows the end marker, or when a page cannot be loaded.
//! Cancellation is observed before every transition and before every item.

use crate::browser::BrowserSession;
use crate::config::{Config, CrawlTarget};
use crate::crawler::item::ItemExtractor;
use crate::crawler::links::{LinkBatch, LinkExtractor};
use crate::crawler::retry::{RetryError, RetryPolicy, RetryRunner};
use crate::output::RecordSink;
use crate::state::{PaginationState, TargetOutcome, TargetStatus};
use crate::url::page_url;
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of extracting the items of one page
enum PageProgress {
    Finished,
    Cancelled,
}

/// Drives one target at a time through the browser session
pub struct PaginationController {
    session: Arc<BrowserSession>,
    retry: RetryRunner,
    links: LinkExtractor,
    items: ItemExtractor,
    page_policy: RetryPolicy,
    page_timeout: Duration,
    single_page_timeout: Duration,
    empty_page_settle: Duration,
    item_pause: Duration,
    end_marker: String,
}

impl PaginationController {
    pub fn new(session: Arc<BrowserSession>, retry: RetryRunner, config: &Config) -> Self {
        Self {
            links: LinkExtractor::new(session.clone(), retry.clone(), config),
            items: ItemExtractor::new(session.clone(), retry.clone(), config),
            session,
            retry,
            page_policy: RetryPolicy::exponential(
                config.retry.page_attempts,
                Duration::from_millis(config.retry.page_base_delay_ms),
            ),
            page_timeout: Duration::from_secs(config.retry.page_timeout_secs),
            single_page_timeout: Duration::from_secs(config.retry.single_page_timeout_secs),
            empty_page_settle: config.crawler.empty_page_settle(),
            item_pause: config.crawler.item_pause(),
            end_marker: config.crawler.end_marker.clone(),
        }
    }

    /// Crawls one target
    ///
    /// Paginated targets always return an outcome; a page that cannot be
    /// loaded marks the outcome failed. A non-paginated target whose single
    /// page cannot be loaded returns [`CrawlError::PageLoadFailed`].
    ///
    /// # Arguments
    ///
    /// * `target` - The listing to crawl
    /// * `sink` - Destination for extracted records
    /// * `seen` - Item URLs already handled in this run; updated in place
    pub async fn crawl_target(
        &self,
        target: &CrawlTarget,
        sink: &mut RecordSink,
        seen: &mut HashSet<String>,
    ) -> crate::Result<TargetOutcome> {
        if target.paginate {
            self.crawl_paginated(target, sink, seen).await
        } else {
            self.crawl_single(target).await
        }
    }

    async fn crawl_paginated(
        &self,
        target: &CrawlTarget,
        sink: &mut RecordSink,
        seen: &mut HashSet<String>,
    ) -> crate::Result<TargetOutcome> {
        let mut outcome = TargetOutcome::new(target.clone());
        let mut state = PaginationState::start();
        let mut html = String::new();

        tracing::info!(url = %target.url, "Starting paginated target");

        loop {
            if !state.is_terminal() && self.retry.is_cancelled() {
                tracing::info!(url = %target.url, state = %state, "Target cancelled");
                outcome.status = TargetStatus::Cancelled;
                break;
            }

            tracing::debug!(url = %target.url, state = %state, "Pagination step");

            state = match state {
                PaginationState::FetchingPage(n) => {
                    let url = page_url(&target.url, n)?;
                    match self.load_listing(url.as_str(), self.page_timeout).await {
                        Ok(page) => {
                            html = page;
                            outcome.pages_fetched += 1;
                            PaginationState::ExtractingItems(n)
                        }
                        Err(CrawlError::Cancelled) => continue,
                        Err(e @ CrawlError::PageLoadFailed { .. }) => {
                            tracing::error!(url = %url, page = n, "{}", e);
                            PaginationState::Failed { page: n }
                        }
                        Err(e) => return Err(e),
                    }
                }

                PaginationState::ExtractingItems(n) => {
                    let Some(batch) = self.discover_with_settle(n).await else {
                        continue;
                    };

                    if batch.is_empty() {
                        tracing::info!(
                            page = n,
                            last_page = n - 1,
                            "No items found after settle retry, listing exhausted"
                        );
                        PaginationState::Done { last_page: n - 1 }
                    } else {
                        match self.extract_items(batch, sink, seen, &mut outcome).await? {
                            PageProgress::Cancelled => continue,
                            PageProgress::Finished if html.contains(&self.end_marker) => {
                                tracing::info!(page = n, "End marker found, listing exhausted");
                                PaginationState::Done { last_page: n }
                            }
                            PageProgress::Finished => PaginationState::Advancing(n),
                        }
                    }
                }

                PaginationState::Advancing(n) => PaginationState::FetchingPage(n + 1),

                PaginationState::Done { last_page } => {
                    outcome.last_page = Some(last_page);
                    break;
                }

                PaginationState::Failed { page } => {
                    outcome.status = TargetStatus::Failed;
                    outcome.last_page = page.checked_sub(1);
                    break;
                }
            };
        }

        tracing::info!(
            url = %target.url,
            status = %outcome.status,
            pages = outcome.pages_fetched,
            records = outcome.records_written,
            "Target finished"
        );

        Ok(outcome)
    }

    async fn crawl_single(&self, target: &CrawlTarget) -> crate::Result<TargetOutcome> {
        let mut outcome = TargetOutcome::new(target.clone());

        tracing::info!(url = %target.url, "Loading single page target");
        match self
            .load_listing(&target.url, self.single_page_timeout)
            .await
        {
            Ok(_) => {
                outcome.pages_fetched = 1;
                outcome.last_page = Some(1);
                Ok(outcome)
            }
            Err(CrawlError::Cancelled) => {
                outcome.status = TargetStatus::Cancelled;
                Ok(outcome)
            }
            Err(e) => Err(e),
        }
    }

    /// Loads a listing page under the page retry policy
    async fn load_listing(&self, url: &str, timeout: Duration) -> crate::Result<String> {
        let session = &self.session;

        self.retry
            .run(&self.page_policy, url, move |_| session.load_page(url, timeout))
            .await
            .map_err(|e| match e {
                RetryError::Cancelled => CrawlError::Cancelled,
                RetryError::Exhausted { attempts, last } => CrawlError::PageLoadFailed {
                    url: url.to_string(),
                    attempts,
                    source: last,
                },
            })
    }

    /// Extracts the loaded page's links, looking once more after the settle
    /// delay if nothing was found
    ///
    /// Returns None if the run was cancelled during the settle delay.
    async fn discover_with_settle(&self, page: u32) -> Option<LinkBatch> {
        let batch = self.extract_links(page).await;
        if !batch.is_empty() {
            return Some(batch);
        }

        tracing::info!(
            page,
            settle_ms = self.empty_page_settle.as_millis() as u64,
            "No items found, waiting before looking again"
        );
        if !self.retry.pause(self.empty_page_settle).await {
            return None;
        }

        Some(self.extract_links(page).await)
    }

    async fn extract_links(&self, page: u32) -> LinkBatch {
        match self.links.extract_links().await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(page, "Link extraction failed: {}", e);
                LinkBatch::default()
            }
        }
    }

    /// Extracts and persists every not-yet-seen link of a batch, in order
    async fn extract_items(
        &self,
        batch: LinkBatch,
        sink: &mut RecordSink,
        seen: &mut HashSet<String>,
        outcome: &mut TargetOutcome,
    ) -> crate::Result<PageProgress> {
        for link in batch.links {
            if self.retry.is_cancelled() {
                return Ok(PageProgress::Cancelled);
            }

            if !seen.insert(link.url.clone()) {
                tracing::debug!(url = %link.url, "Skipping already seen item");
                continue;
            }

            match self.items.extract(&link).await {
                Ok(record) => {
                    sink.append(&record)?;
                    outcome.records_written += 1;
                }
                Err(CrawlError::Cancelled) => return Ok(PageProgress::Cancelled),
                Err(e) => {
                    tracing::warn!(url = %link.url, "Skipping item: {}", e);
                    continue;
                }
            }

            if !self.retry.pause(self.item_pause).await {
                return Ok(PageProgress::Cancelled);
            }
        }

        Ok(PageProgress::Finished)
    }
}
