//! Crawler module for listing and game page processing
//!
//! This module contains the core crawling logic, including:
//! - Bounded retries with backoff and cancellation
//! - Item link discovery and concurrent hover probes
//! - Game page and tag page parsing
//! - The per-target pagination state machine
//! - Overall crawl coordination

mod coordinator;
mod item;
mod links;
mod pagination;
pub mod retry;
pub mod scripts;
mod tags;

pub use coordinator::Coordinator;
pub use item::{parse_item_page, ItemExtractor};
pub use links::{derive_cover_url, ItemLink, LinkBatch, LinkExtractor};
pub use pagination::PaginationController;
pub use retry::{Backoff, RetryError, RetryPolicy, RetryRunner};
pub use tags::{parse_tag_groups, TagExtractor};
