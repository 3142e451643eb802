//! State module for tracking crawl progress
//!
//! This module provides the state types a crawl run moves through.
//!
//! # Components
//!
//! - `PaginationState`: Tracks where a paginated target is (fetching, extracting, advancing, done, failed)
//! - `TargetOutcome`: Records how each configured target ended and what it produced

mod pagination_state;
mod target_state;

// Re-export main types
pub use pagination_state::PaginationState;
pub use target_state::{TargetOutcome, TargetStatus};
