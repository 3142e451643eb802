//! Run summary generation
//!
//! This module collects what a crawl run produced and prints it once the
//! run is over.

use crate::state::{TargetOutcome, TargetStatus};
use chrono::{DateTime, Utc};

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// One outcome per target that was started, in target order
    pub targets: Vec<TargetOutcome>,

    /// Number of tag groups written, if the tag pass ran and succeeded
    pub tag_groups: Option<usize>,

    /// True if the run stopped early because of a signal or the deadline
    pub cancelled: bool,
}

impl RunSummary {
    /// Starts a summary stamped with the current time
    pub fn begin() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            targets: Vec::new(),
            tag_groups: None,
            cancelled: false,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_pages(&self) -> u64 {
        self.targets.iter().map(|t| u64::from(t.pages_fetched)).sum()
    }

    pub fn total_records(&self) -> u64 {
        self.targets.iter().map(|t| t.records_written).sum()
    }

    /// Number of targets that ended with the given status
    pub fn count_status(&self, status: TargetStatus) -> usize {
        self.targets.iter().filter(|t| t.status == status).count()
    }

    /// Run duration in whole seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Pages fetched: {}", summary.total_pages());
    println!("  Records written: {}", summary.total_records());
    if summary.cancelled {
        println!("  Run was cancelled before completion");
    }
    println!();

    if !summary.targets.is_empty() {
        println!("Targets ({}):", summary.targets.len());
        for outcome in &summary.targets {
            let last_page = outcome
                .last_page
                .map(|p| format!(", last page {}", p))
                .unwrap_or_default();
            println!(
                "  - {} [{}] {} pages, {} records{}",
                outcome.target.url,
                outcome.status,
                outcome.pages_fetched,
                outcome.records_written,
                last_page
            );
        }
        println!();
    }

    match summary.tag_groups {
        Some(groups) => println!("Tag groups written: {}", groups),
        None => println!("Tag groups written: none"),
    }

    let completed = summary.count_status(TargetStatus::Completed);
    let completion_rate = if summary.targets.is_empty() {
        0.0
    } else {
        (completed as f64 / summary.targets.len() as f64) * 100.0
    };

    println!(
        "Completion Rate: {:.1}% ({} / {} targets completed)",
        completion_rate,
        completed,
        summary.targets.len()
    );
}
