//! Output module for persisting crawl results
//!
//! This module handles:
//! - Appending extracted game records to the items CSV file
//! - Writing the tag groups file
//! - Reading back URLs already present in an items file
//! - Summarizing a finished run

mod existing;
mod records;
mod sink;
pub mod stats;
mod tags;

pub use existing::load_existing_urls;
pub use records::{
    or_not_available, ItemRecord, TagEntry, TagGroup, ITEM_COLUMNS, NOT_AVAILABLE, TAG_COLUMNS,
};
pub use sink::RecordSink;
pub use stats::{print_summary, RunSummary};
pub use tags::write_tag_groups;

use thiserror::Error;

/// Errors raised while writing or reading output files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
