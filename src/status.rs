//! Derived page status.

use serde::{Deserialize, Serialize};

/// How far along a page is. Ordered so that more words never move a page
/// backwards.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Empty,
    Draft,
    Complete,
}

impl Default for PageStatus {
    fn default() -> Self {
        PageStatus::Empty
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PageStatus::Empty => "empty",
            PageStatus::Draft => "draft",
            PageStatus::Complete => "complete",
        };
        write!(f, "{}", label)
    }
}

/// Classify a page by word count against its format's completion threshold.
///
/// A page is complete at 80% of the threshold. The comparison is done in
/// integers (`words * 5 >= threshold * 4`) so it is exact.
pub fn classify_status(word_count: usize, threshold: usize) -> PageStatus {
    if word_count == 0 {
        PageStatus::Empty
    } else if word_count.saturating_mul(5) >= threshold.saturating_mul(4) {
        PageStatus::Complete
    } else {
        PageStatus::Draft
    }
}
