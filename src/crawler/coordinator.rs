//! Crawler coordinator - main crawl orchestration logic
//!
//! This module runs a whole crawl:
//! - Opening the items file and seeding the seen-link set
//! - Crawling every configured target in order
//! - Applying the fail-fast rule to single page targets
//! - Running the tag pass once the targets are done
//! - Collecting the run summary

use crate::browser::{BrowserDriver, BrowserSession};
use crate::config::Config;
use crate::crawler::pagination::PaginationController;
use crate::crawler::retry::RetryRunner;
use crate::crawler::tags::TagExtractor;
use crate::output::{load_existing_urls, write_tag_groups, RecordSink, RunSummary};
use crate::state::{TargetOutcome, TargetStatus};
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    retry: RetryRunner,
    pagination: PaginationController,
    tags: TagExtractor,
    sink: RecordSink,
    seen: HashSet<String>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `driver` - Browser backend every page load goes through
    /// * `cancel` - Token that stops the run when cancelled
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Items file opened and ready
    /// * `Err(CrawlError)` - The items file could not be opened or read
    pub fn new(
        config: Config,
        driver: Arc<dyn BrowserDriver>,
        cancel: CancellationToken,
    ) -> crate::Result<Self> {
        let session = Arc::new(BrowserSession::new(
            driver,
            config.browser.ready_selector.clone(),
        ));
        let retry = RetryRunner::new(cancel);

        let sink = RecordSink::open(&config.output.items_path)?;

        let seen = if config.output.skip_existing {
            let existing = load_existing_urls(&config.output.items_path)?;
            tracing::info!(
                count = existing.len(),
                path = %config.output.items_path,
                "Skipping items already present in output"
            );
            existing
        } else {
            HashSet::new()
        };

        Ok(Self {
            pagination: PaginationController::new(session.clone(), retry.clone(), &config),
            tags: TagExtractor::new(session, config.crawler.tags_timeout()),
            config,
            retry,
            sink,
            seen,
        })
    }

    /// Runs every target in order, then the tag pass
    ///
    /// A paginated target that fails is recorded and the run moves on. A
    /// single page target that fails aborts the run when `fail-fast` is set.
    /// Tag pass failures are logged and never abort the run.
    pub async fn run(&mut self) -> crate::Result<RunSummary> {
        let mut summary = RunSummary::begin();
        let targets = self.config.targets.clone();

        tracing::info!(targets = targets.len(), "Starting crawl");

        for target in &targets {
            if self.retry.is_cancelled() {
                tracing::info!("Run cancelled, skipping remaining targets");
                break;
            }

            match self
                .pagination
                .crawl_target(target, &mut self.sink, &mut self.seen)
                .await
            {
                Ok(outcome) => summary.targets.push(outcome),
                Err(e @ CrawlError::PageLoadFailed { .. }) => {
                    let mut outcome = TargetOutcome::new(target.clone());
                    outcome.status = TargetStatus::Failed;
                    summary.targets.push(outcome);

                    if self.config.crawler.fail_fast {
                        tracing::error!(url = %target.url, "Aborting run: {}", e);
                        return Err(e);
                    }
                    tracing::error!(url = %target.url, "Target failed: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        summary.cancelled = self.retry.is_cancelled();

        if !summary.cancelled {
            match self.tag_pass().await {
                Ok(groups) => summary.tag_groups = Some(groups),
                Err(e) => tracing::error!("Tag extraction failed: {}", e),
            }
        }

        summary.finish();

        tracing::info!(
            pages = summary.total_pages(),
            records = summary.total_records(),
            written = self.sink.written(),
            cancelled = summary.cancelled,
            "Crawl completed"
        );

        Ok(summary)
    }

    /// Runs only the tag pass; its failure is returned
    pub async fn run_tags_only(&mut self) -> crate::Result<RunSummary> {
        let mut summary = RunSummary::begin();
        summary.tag_groups = Some(self.tag_pass().await?);
        summary.finish();
        Ok(summary)
    }

    /// Extracts the tag groups and writes the tags file
    async fn tag_pass(&self) -> crate::Result<usize> {
        let groups = tokio::select! {
            _ = self.retry.cancel_token().cancelled() => return Err(CrawlError::Cancelled),
            groups = self.tags.extract_tags(&self.config.crawler.tags_url) => groups?,
        };

        write_tag_groups(&self.config.output.tags_path, &groups)?;
        Ok(groups.len())
    }
}
