//! URL handling module
//!
//! This module provides listing page URL construction, href resolution and
//! item link filtering.

mod normalize;
mod pages;

// Re-export main functions
pub use normalize::{dedup_preserving_order, is_item_url, parse_http_url, resolve_href};
pub use pages::page_url;
