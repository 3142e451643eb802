/// Per-target results of a crawl run
use crate::config::CrawlTarget;
use std::fmt;

/// How a target's crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStatus {
    /// Every reachable page of the target was processed
    Completed,

    /// A page load exhausted its retries
    Failed,

    /// The run was cancelled while the target was in progress
    Cancelled,
}

impl TargetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to one configured target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: CrawlTarget,

    /// Listing pages loaded successfully
    pub pages_fetched: u32,

    /// Records appended to the items file for this target
    pub records_written: u64,

    pub status: TargetStatus,

    /// Last page that produced items, for paginated targets
    pub last_page: Option<u32>,
}

impl TargetOutcome {
    /// An outcome with nothing fetched yet
    pub fn new(target: CrawlTarget) -> Self {
        Self {
            target,
            pages_fetched: 0,
            records_written: 0,
            status: TargetStatus::Completed,
            last_page: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == TargetStatus::Failed
    }
}
