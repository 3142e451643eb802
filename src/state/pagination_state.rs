/// Pagination state definitions for walking a paginated listing
///
/// This module defines the states a paginated target moves through while
/// its listing pages are fetched and their items extracted.
use std::fmt;

/// Current position of a paginated target in its crawl
///
/// The normal cycle is `FetchingPage(n)` -> `ExtractingItems(n)` ->
/// `Advancing(n)` -> `FetchingPage(n + 1)`, until a page is empty, carries
/// the end marker, or cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationState {
    // ===== Active States =====
    /// Listing page `n` is being loaded
    FetchingPage(u32),

    /// Item links of page `n` are being discovered and extracted
    ExtractingItems(u32),

    /// Page `n` is finished and the next page is about to be loaded
    Advancing(u32),

    // ===== Terminal States =====
    /// The listing is exhausted; `last_page` is the last page that had items
    Done { last_page: u32 },

    /// Page `page` could not be loaded within its retry budget
    Failed { page: u32 },
}

impl PaginationState {
    /// The first state of every paginated target
    pub fn start() -> Self {
        Self::FetchingPage(1)
    }

    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }

    /// Page number this state refers to
    pub fn page(&self) -> u32 {
        match *self {
            Self::FetchingPage(n) | Self::ExtractingItems(n) | Self::Advancing(n) => n,
            Self::Done { last_page } => last_page,
            Self::Failed { page } => page,
        }
    }

    /// Converts the state to a short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::FetchingPage(_) => "fetching_page",
            Self::ExtractingItems(_) => "extracting_items",
            Self::Advancing(_) => "advancing",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label(), self.page())
    }
}
