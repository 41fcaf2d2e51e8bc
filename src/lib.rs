//! Chapter pagination engine.
//!
//! Splits chapter text into numbered pages sized for a paper format, re-flows
//! a single edited page when it overflows, and compacts sparse sequences back
//! together. Everything here is pure apart from the `store` seam.

pub mod compact;
pub mod config;
pub mod error;
pub mod format;
pub mod markup;
pub mod metrics;
pub mod overflow;
pub mod page;
pub mod pagination;
pub mod redistribute;
pub mod status;
pub mod store;

pub use compact::{compact_pages, merge_pages};
pub use error::PaginationError;
pub use format::{Capacity, PaperFormat};
pub use metrics::{TextMetrics, effective_length, word_count};
pub use overflow::{Boundary, Fragment, split_overflow, split_overflow_detailed};
pub use page::{ChapterSummary, Page, PageRecord};
pub use pagination::{
    DEFAULT_PAGE_BUDGET, MANUAL_BREAK, PaginationOptions, SplitMode, paginate_chapter,
    split_chapter_to_pages,
};
pub use redistribute::redistribute_page;
pub use status::{PageStatus, classify_status};
pub use store::{MemoryPageStore, PageStore, StoredPage, SyncReport, sync_chapter};
