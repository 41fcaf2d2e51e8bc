//! The `Page` value object handed to storage.

use crate::error::PaginationError;
use crate::format::PaperFormat;
use crate::metrics::{TextMetrics, effective_length};
use crate::status::{PageStatus, classify_status};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One page of a chapter.
///
/// `status` and `word_count` are derived from `content` and can only change
/// together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Storage id; `None` until the page has been persisted.
    pub id: Option<String>,
    pub chapter_id: Option<String>,
    page_number: u32,
    content: String,
    status: PageStatus,
    word_count: usize,
}

/// A page as it comes back from storage, before metrics are recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub chapter_id: Option<String>,
    pub page_number: u32,
    #[serde(default)]
    pub content: String,
}

impl Page {
    pub fn new(page_number: u32, content: impl Into<String>, format: PaperFormat) -> Self {
        let mut page = Self {
            id: None,
            chapter_id: None,
            page_number,
            content: String::new(),
            status: PageStatus::Empty,
            word_count: 0,
        };
        page.set_content(content, format);
        page
    }

    pub fn from_record(record: PageRecord, format: PaperFormat) -> Self {
        let mut page = Self::new(record.page_number, record.content, format);
        page.id = record.id;
        page.chapter_id = record.chapter_id;
        page
    }

    pub fn into_record(self) -> PageRecord {
        PageRecord {
            id: self.id,
            chapter_id: self.chapter_id,
            page_number: self.page_number,
            content: self.content,
        }
    }

    pub fn with_chapter(mut self, chapter_id: Option<String>) -> Self {
        self.chapter_id = chapter_id;
        self
    }

    /// Replace the content and recompute the derived fields.
    pub fn set_content(&mut self, content: impl Into<String>, format: PaperFormat) {
        self.content = content.into();
        let metrics = TextMetrics::measure(&self.content);
        self.word_count = metrics.word_count;
        self.status = classify_status(metrics.word_count, format.word_completion_threshold());
    }

    pub fn renumbered(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// True when the page holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn effective_length(&self) -> usize {
        effective_length(&self.content)
    }

    pub fn exceeds_limit(&self, format: PaperFormat) -> bool {
        self.effective_length() > format.char_limit()
    }

    /// SHA-256 of the content, hex encoded.
    pub fn fingerprint(&self) -> String {
        content_fingerprint(&self.content)
    }
}

pub fn content_fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether the pages, in slice order, are numbered `n, n+1, n+2, ...`.
pub fn is_contiguous(pages: &[Page]) -> bool {
    check_contiguous(pages).is_ok()
}

pub fn check_contiguous(pages: &[Page]) -> Result<(), PaginationError> {
    let Some(first) = pages.first() else {
        return Ok(());
    };
    let mut expected = first.page_number;
    for page in pages {
        if page.page_number != expected {
            return Err(PaginationError::NonContiguous {
                expected,
                found: page.page_number,
            });
        }
        expected = expected.saturating_add(1);
    }
    Ok(())
}

/// Chapter-level statistics over a page sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub page_count: usize,
    pub total_words: usize,
    pub empty_pages: usize,
    pub draft_pages: usize,
    pub complete_pages: usize,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub contiguous: bool,
}

impl ChapterSummary {
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut sorted: Vec<&Page> = pages.iter().collect();
        sorted.sort_by_key(|page| page.page_number);

        let mut summary = ChapterSummary {
            page_count: pages.len(),
            first_page: sorted.first().map(|page| page.page_number),
            last_page: sorted.last().map(|page| page.page_number),
            contiguous: sorted
                .windows(2)
                .all(|pair| pair[0].page_number.checked_add(1) == Some(pair[1].page_number)),
            ..ChapterSummary::default()
        };
        for page in pages {
            summary.total_words += page.word_count;
            match page.status {
                PageStatus::Empty => summary.empty_pages += 1,
                PageStatus::Draft => summary.draft_pages += 1,
                PageStatus::Complete => summary.complete_pages += 1,
            }
        }
        summary
    }
}
