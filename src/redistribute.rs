//! Re-splitting a single edited page and shifting the pages after it.
//!
//! Only the edited page is re-flowed; neighbours are never pulled in. The
//! shift is computed relative to the sequence passed in, so callers must
//! serialize edits per chapter against the latest stored sequence.

use crate::error::PaginationError;
use crate::format::PaperFormat;
use crate::overflow::split_overflow;
use crate::page::Page;
use tracing::debug;

/// Replace the content of `page_number` and re-split it if it overflows.
///
/// A page that splits into `k` fragments becomes `k` consecutive pages
/// starting at its own number; the first keeps its storage id, the rest are
/// new. Every later page moves up by `k - 1`.
pub fn redistribute_page(
    pages: &[Page],
    page_number: u32,
    new_content: &str,
    format: PaperFormat,
) -> Result<Vec<Page>, PaginationError> {
    let edited = pages
        .iter()
        .find(|page| page.page_number() == page_number)
        .ok_or(PaginationError::PageNotFound { page_number })?;

    let fragments = split_overflow(new_content, format.char_limit());
    let added = fragments.len().saturating_sub(1) as u32;

    let mut result = Vec::with_capacity(pages.len() + added as usize);
    for page in pages {
        if page.page_number() > page_number {
            let shifted = page.page_number() + added;
            result.push(page.clone().renumbered(shifted));
        } else if page.page_number() < page_number {
            result.push(page.clone());
        }
    }

    for (offset, fragment) in fragments.into_iter().enumerate() {
        let number = page_number + offset as u32;
        let page = if offset == 0 {
            let mut page = edited.clone();
            page.set_content(fragment, format);
            page
        } else {
            Page::new(number, fragment, format).with_chapter(edited.chapter_id.clone())
        };
        result.push(page);
    }

    result.sort_by_key(Page::page_number);
    debug!(
        page_number,
        new_pages = added,
        total = result.len(),
        "Redistributed edited page"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::is_contiguous;

    const FORMAT: PaperFormat = PaperFormat::Novel;

    fn chapter(contents: &[&str]) -> Vec<Page> {
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| {
                let mut page = Page::new(i as u32 + 1, *content, FORMAT)
                    .with_chapter(Some("ch".to_string()));
                page.id = Some(format!("row-{}", i + 1));
                page
            })
            .collect()
    }

    #[test]
    fn fitting_edit_replaces_content_in_place() {
        let pages = chapter(&["one", "two", "three"]);
        let result = redistribute_page(&pages, 2, "two, revised and longer", FORMAT)
            .expect("page 2 exists");

        assert_eq!(result.len(), 3);
        assert_eq!(result[0], pages[0]);
        assert_eq!(result[1].content(), "two, revised and longer");
        assert_eq!(result[1].word_count(), 4);
        assert_eq!(result[1].id.as_deref(), Some("row-2"));
        assert_eq!(result[2], pages[2]);
    }

    #[test]
    fn growing_page_shifts_following_pages() {
        let pages = chapter(&["first page", "second page", "third page"]);
        let grown = format!("{}\n\n{}", "alpha ".repeat(150), "beta ".repeat(150));
        let result = redistribute_page(&pages, 2, &grown, FORMAT).expect("page 2 exists");

        let numbers: Vec<u32> = result.iter().map(Page::page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(result[0], pages[0]);
        assert_eq!(result[1].id.as_deref(), Some("row-2"));
        assert_eq!(result[1].content(), "alpha ".repeat(150).trim());
        assert!(result[2].id.is_none());
        assert_eq!(result[2].chapter_id.as_deref(), Some("ch"));
        assert_eq!(result[3].content(), "third page");
        assert_eq!(result[3].id.as_deref(), Some("row-3"));
    }

    #[test]
    fn split_into_many_fragments_keeps_numbering_contiguous() {
        let pages = chapter(&["a", "b", "c", "d"]);
        let huge = "lorem ipsum ".repeat(600);
        let result = redistribute_page(&pages, 1, &huge, FORMAT).expect("page 1 exists");

        assert!(result.len() > 4);
        assert!(is_contiguous(&result));
        assert_eq!(result.last().map(Page::content), Some("d"));
        assert!(result.iter().all(|page| !page.exceeds_limit(FORMAT)));
    }

    #[test]
    fn clearing_a_page_keeps_it_as_empty() {
        let pages = chapter(&["a", "b"]);
        let result = redistribute_page(&pages, 2, "", FORMAT).expect("page 2 exists");
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].content(), "");
        assert_eq!(result[1].word_count(), 0);
    }

    #[test]
    fn unknown_page_is_rejected() {
        let pages = chapter(&["a"]);
        assert_eq!(
            redistribute_page(&pages, 5, "x", FORMAT),
            Err(PaginationError::PageNotFound { page_number: 5 })
        );
    }

    #[test]
    fn unsorted_input_comes_back_sorted() {
        let mut pages = chapter(&["a", "b", "c"]);
        pages.reverse();
        let result = redistribute_page(&pages, 3, "c2", FORMAT).expect("page 3 exists");
        let numbers: Vec<u32> = result.iter().map(Page::page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(result[2].content(), "c2");
    }

    #[test]
    fn offset_sequences_shift_relative_to_edited_page() {
        let pages: Vec<Page> = (10..13)
            .map(|n| Page::new(n, format!("page {n}"), FORMAT))
            .collect();
        let result = redistribute_page(&pages, 10, &"x".repeat(2500), FORMAT)
            .expect("page 10 exists");
        let numbers: Vec<u32> = result.iter().map(Page::page_number).collect();
        assert_eq!(numbers, vec![10, 11, 12, 13, 14]);
        assert_eq!(result[3].content(), "page 11");
    }
}
