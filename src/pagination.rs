//! Cold-start pagination of a whole chapter.
//!
//! Two modes. If the author placed manual page breaks, each delimited
//! segment becomes exactly one page no matter how long it is. Otherwise
//! paragraphs are packed greedily up to a nominal page budget, which is a
//! packing heuristic and not the hard per-format limit; `paginate_chapter`
//! applies that limit afterwards.

use crate::format::PaperFormat;
use crate::metrics::effective_length;
use crate::overflow::split_overflow;
use crate::page::Page;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Literal token that forces a page boundary.
pub const MANUAL_BREAK: &str = "---pagebreak---";
/// Effective characters packed onto a page before a new one is started.
pub const DEFAULT_PAGE_BUDGET: usize = 1500;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    Manual,
    Automatic,
}

impl SplitMode {
    pub fn detect(text: &str) -> Self {
        if text.contains(MANUAL_BREAK) {
            SplitMode::Manual
        } else {
            SplitMode::Automatic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    pub format: PaperFormat,
    pub page_budget: usize,
    /// Copied onto every produced page.
    pub chapter_id: Option<String>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            format: PaperFormat::default(),
            page_budget: DEFAULT_PAGE_BUDGET,
            chapter_id: None,
        }
    }
}

impl PaginationOptions {
    pub fn for_format(format: PaperFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Split a chapter into pages numbered from `start_page` (0 is treated as 1).
///
/// Always returns at least one page; empty input gives a single empty page.
pub fn split_chapter_to_pages(text: &str, start_page: u32, options: &PaginationOptions) -> Vec<Page> {
    let mode = SplitMode::detect(text);
    let contents = match mode {
        SplitMode::Manual => split_manual(text),
        SplitMode::Automatic => pack_paragraphs(text, options.page_budget),
    };
    debug!(?mode, pages = contents.len(), start_page, "Split chapter into pages");
    number_pages(contents, start_page, options)
}

/// Initial split followed by the overflow splitter on every packed page, so
/// no page exceeds the format's character limit unless it had to be hard cut.
///
/// Manual-break pages are kept exactly as the author delimited them.
pub fn paginate_chapter(text: &str, start_page: u32, options: &PaginationOptions) -> Vec<Page> {
    let mode = SplitMode::detect(text);
    let contents = match mode {
        SplitMode::Manual => split_manual(text),
        SplitMode::Automatic => {
            let limit = options.format.char_limit();
            pack_paragraphs(text, options.page_budget)
                .into_iter()
                .flat_map(|content| split_overflow(&content, limit))
                .collect()
        }
    };
    debug!(
        ?mode,
        format = %options.format,
        pages = contents.len(),
        "Paginated chapter"
    );
    number_pages(contents, start_page, options)
}

fn number_pages(contents: Vec<String>, start_page: u32, options: &PaginationOptions) -> Vec<Page> {
    let start_page = start_page.max(1);
    contents
        .into_iter()
        .zip(start_page..)
        .map(|(content, number)| {
            Page::new(number, content, options.format).with_chapter(options.chapter_id.clone())
        })
        .collect()
}

fn split_manual(text: &str) -> Vec<String> {
    text.split(MANUAL_BREAK)
        .map(|segment| segment.trim().to_string())
        .collect()
}

/// Greedily pack paragraphs into pages of roughly `budget` effective chars.
fn pack_paragraphs(text: &str, budget: usize) -> Vec<String> {
    let paragraphs = split_paragraphs(text);
    if paragraphs.is_empty() {
        return vec![String::new()];
    }

    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for para in paragraphs {
        let separator_len = if current.is_empty() { 0 } else { PARAGRAPH_SEPARATOR.len() };
        let para_len = effective_length(&para);
        let prospective_len = current_len + separator_len + para_len;

        if !current.is_empty() && prospective_len > budget {
            pages.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current.is_empty() {
            // A paragraph longer than the budget still starts its own page intact.
            current.push_str(&para);
            current_len = para_len;
        } else {
            current.push_str(PARAGRAPH_SEPARATOR);
            current.push_str(&para);
            current_len += separator_len + para_len;
        }
    }

    if !current.is_empty() {
        pages.push(current);
    }

    pages
}

/// Split text into paragraphs separated by blank lines.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut buffer = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !buffer.is_empty() {
                paragraphs.push(buffer.join("\n"));
                buffer.clear();
            }
        } else {
            buffer.push(line);
        }
    }

    if !buffer.is_empty() {
        paragraphs.push(buffer.join("\n"));
    }

    paragraphs
}
