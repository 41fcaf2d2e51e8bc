//! Persistence seam for page sequences.
//!
//! The engine itself is pure; this module is the thin shell that turns an
//! engine result into row upserts and deletes keyed by
//! `(chapter_id, page_number)`. Rows carry a content fingerprint so a sync
//! only rewrites pages whose text or position actually changed.

use crate::page::{Page, PageRecord, check_contiguous, content_fingerprint};
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A stored row plus the fingerprint of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub record: PageRecord,
    pub fingerprint: String,
}

/// Storage for page rows. Implementations own id assignment.
pub trait PageStore {
    /// All rows of a chapter, ordered by page number.
    fn load_chapter(&self, chapter_id: &str) -> Result<Vec<StoredPage>>;
    /// Insert or replace the row at `record.page_number`; returns the row id.
    fn upsert(&mut self, chapter_id: &str, record: PageRecord) -> Result<String>;
    fn delete(&mut self, chapter_id: &str, page_number: u32) -> Result<()>;
}

/// In-memory arena of page rows, keyed by chapter and page number.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    rows: BTreeMap<(String, u32), StoredPage>,
    next_id: u64,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl PageStore for MemoryPageStore {
    fn load_chapter(&self, chapter_id: &str) -> Result<Vec<StoredPage>> {
        Ok(self
            .rows
            .range((chapter_id.to_string(), 0)..=(chapter_id.to_string(), u32::MAX))
            .map(|(_, row)| row.clone())
            .collect())
    }

    fn upsert(&mut self, chapter_id: &str, mut record: PageRecord) -> Result<String> {
        if record.page_number == 0 {
            return Err(anyhow!("page numbers start at 1"));
        }
        let id = match record.id.take() {
            Some(id) => id,
            None => {
                self.next_id += 1;
                format!("{chapter_id}:{}", self.next_id)
            }
        };
        record.id = Some(id.clone());
        record.chapter_id = Some(chapter_id.to_string());
        let fingerprint = content_fingerprint(&record.content);
        self.rows.insert(
            (chapter_id.to_string(), record.page_number),
            StoredPage {
                record,
                fingerprint,
            },
        );
        Ok(id)
    }

    fn delete(&mut self, chapter_id: &str, page_number: u32) -> Result<()> {
        self.rows
            .remove(&(chapter_id.to_string(), page_number))
            .map(|_| ())
            .ok_or_else(|| anyhow!("no page {page_number} stored for chapter {chapter_id}"))
    }
}

/// What a sync did to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
}

/// Make storage hold exactly `pages` for `chapter_id`.
///
/// Ids assigned by the store are written back into `pages`, which are left
/// sorted by page number. The numbers must form a contiguous run; the caller
/// is expected to serialize syncs per chapter.
pub fn sync_chapter<S: PageStore>(
    store: &mut S,
    chapter_id: &str,
    pages: &mut [Page],
) -> Result<SyncReport> {
    pages.sort_by_key(Page::page_number);
    check_contiguous(pages)?;

    let existing: BTreeMap<u32, StoredPage> = store
        .load_chapter(chapter_id)?
        .into_iter()
        .map(|row| (row.record.page_number, row))
        .collect();

    let mut report = SyncReport::default();
    for page in pages.iter_mut() {
        let stored = existing.get(&page.page_number());
        let same_row = stored.is_some_and(|row| {
            row.fingerprint == page.fingerprint()
                && (page.id.is_none() || row.record.id == page.id)
        });
        if same_row {
            page.id = stored.and_then(|row| row.record.id.clone());
            report.unchanged += 1;
            continue;
        }

        let mut record = page.clone().into_record();
        record.chapter_id = Some(chapter_id.to_string());
        let id = store.upsert(chapter_id, record)?;
        page.id = Some(id);
        page.chapter_id = Some(chapter_id.to_string());
        if stored.is_some() {
            report.updated += 1;
        } else {
            report.inserted += 1;
        }
    }

    let kept: Vec<u32> = pages.iter().map(Page::page_number).collect();
    for number in existing.keys().filter(|number| !kept.contains(*number)) {
        store.delete(chapter_id, *number)?;
        report.deleted += 1;
    }

    debug!(chapter_id, ?report, "Synced chapter pages");
    if report.deleted > 0 {
        info!(chapter_id, deleted = report.deleted, "Removed stale pages");
    }
    Ok(report)
}
