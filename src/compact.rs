//! Folding pages back together.
//!
//! `compact_pages` is the cleanup pass that merges under-full neighbours and
//! drops blank pages; `merge_pages` rebuilds one chapter string from a page
//! sequence.

use crate::format::PaperFormat;
use crate::metrics::spread_length;
use crate::page::Page;
use tracing::debug;

const PAGE_SEPARATOR: &str = "\n\n";

/// Merge adjacent pages while the result stays within the format limit.
///
/// Blank pages are dropped, output is numbered from 1 and a chapter always
/// keeps at least one page. Running it twice changes nothing.
///
/// The fit check uses [`spread_length`], which bounds the effective length
/// from above and only grows as pages are appended. The effective length
/// shrinks once a merge brings markup into plain text, which would let a
/// second pass merge pages the first pass kept apart.
pub fn compact_pages(pages: &[Page], format: PaperFormat) -> Vec<Page> {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by_key(|page| page.page_number());

    let limit = format.char_limit();
    let mut output: Vec<Page> = Vec::new();

    for page in sorted.iter().copied().filter(|page| !page.is_blank()) {
        let merged = match output.last_mut() {
            Some(current) => {
                let combined = format!("{}{PAGE_SEPARATOR}{}", current.content(), page.content());
                let fits = spread_length(&combined) <= limit;
                if fits {
                    current.set_content(combined, format);
                }
                fits
            }
            None => false,
        };
        if !merged {
            let number = output.len() as u32 + 1;
            output.push(page.clone().renumbered(number));
        }
    }

    if output.is_empty() {
        let chapter_id = sorted.first().and_then(|page| page.chapter_id.clone());
        let id = sorted.first().and_then(|page| page.id.clone());
        let mut empty = Page::new(1, "", format).with_chapter(chapter_id);
        empty.id = id;
        output.push(empty);
    }

    debug!(
        before = pages.len(),
        after = output.len(),
        %format,
        "Compacted chapter pages"
    );
    output
}

/// Join non-blank page contents, in page order, into a single chapter.
pub fn merge_pages(pages: &[Page]) -> String {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by_key(|page| page.page_number());
    sorted
        .into_iter()
        .filter(|page| !page.is_blank())
        .map(Page::content)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::collapse_whitespace;
    use crate::page::is_contiguous;
    use crate::pagination::{PaginationOptions, split_chapter_to_pages};
    use crate::status::PageStatus;

    const FORMAT: PaperFormat = PaperFormat::A5;

    fn pages(contents: &[&str]) -> Vec<Page> {
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| Page::new(i as u32 + 1, *content, FORMAT))
            .collect()
    }

    #[test]
    fn drops_blank_pages_around_content() {
        let result = compact_pages(&pages(&["", "short text", ""]), FORMAT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].page_number(), 1);
        assert_eq!(result[0].content(), "short text");
    }

    #[test]
    fn all_blank_input_keeps_one_empty_page() {
        let result = compact_pages(&pages(&["", "  ", "\n"]), FORMAT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].page_number(), 1);
        assert_eq!(result[0].status(), PageStatus::Empty);

        let result = compact_pages(&[], FORMAT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content(), "");
    }

    #[test]
    fn merges_under_full_neighbours_and_recomputes_metrics() {
        let result = compact_pages(&pages(&["one two", "three", "four five six"]), FORMAT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content(), "one two\n\nthree\n\nfour five six");
        assert_eq!(result[0].word_count(), 6);
    }

    #[test]
    fn respects_char_limit_when_merging() {
        let big = "b".repeat(1000);
        let medium = "m".repeat(600);
        let result = compact_pages(&pages(&[&big, &medium, "tail"]), FORMAT);
        let merged = format!("{medium}\n\ntail");
        let contents: Vec<&str> = result.iter().map(Page::content).collect();
        assert_eq!(contents, vec![big.as_str(), merged.as_str()]);
        assert!(is_contiguous(&result));
        assert!(result.iter().all(|page| !page.exceeds_limit(FORMAT)));
    }

    #[test]
    fn keeps_id_of_first_page_in_each_group() {
        let mut input = pages(&["a", "b", &"c".repeat(1499)]);
        for (i, page) in input.iter_mut().enumerate() {
            page.id = Some(format!("row-{i}"));
        }
        let result = compact_pages(&input, FORMAT);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id.as_deref(), Some("row-0"));
        assert_eq!(result[1].id.as_deref(), Some("row-2"));
        assert_eq!(result[1].page_number(), 2);
    }

    #[test]
    fn compaction_is_idempotent() {
        let text: String = (0..60)
            .map(|i| format!("Paragraph {i} {}", "filler ".repeat(i * 13 % 70)))
            .collect::<Vec<_>>()
            .join("\n\n");
        let opts = PaginationOptions {
            format: FORMAT,
            page_budget: 200,
            chapter_id: None,
        };
        let mut initial = split_chapter_to_pages(&text, 1, &opts);
        initial.insert(3, Page::new(0, "", FORMAT));

        let once = compact_pages(&initial, FORMAT);
        let twice = compact_pages(&once, FORMAT);
        assert_eq!(once, twice);
        assert!(is_contiguous(&once));
        assert_eq!(once[0].page_number(), 1);
    }

    #[test]
    fn mixed_plain_and_markup_pages_compact_idempotently() {
        let spaced = format!("a{}b", " ".repeat(700));
        let input = pages(&[&spaced, &"c".repeat(798), "<b>d</b>"]);

        let once = compact_pages(&input, FORMAT);
        let twice = compact_pages(&once, FORMAT);
        assert_eq!(once.len(), 2);
        assert_eq!(once[0].content(), spaced);
        assert_eq!(once, twice);
        assert!(once.iter().all(|page| !page.exceeds_limit(FORMAT)));
    }

    #[test]
    fn markup_families_stay_stable_under_recompaction() {
        for width in [120usize, 333, 497, 640] {
            let input: Vec<Page> = (0..12)
                .map(|i| {
                    let body = "x".repeat(width / (i % 3 + 1));
                    let content = match i % 4 {
                        0 => format!("<p>{body}</p>"),
                        1 => format!("{body}{}{body} &amp;", " ".repeat(i * 20)),
                        2 => format!("<em>{body}</em> &amp; more"),
                        _ => body,
                    };
                    Page::new(i as u32 + 1, content, FORMAT)
                })
                .collect();

            let once = compact_pages(&input, FORMAT);
            assert_eq!(compact_pages(&once, FORMAT), once, "width={width}");
            assert!(is_contiguous(&once));
            assert!(
                once.iter().all(|page| !page.exceeds_limit(FORMAT)),
                "width={width}"
            );
        }
    }

    #[test]
    fn merge_joins_in_page_order_skipping_blanks() {
        let mut input = pages(&["first", "", "second", "third"]);
        input.reverse();
        assert_eq!(merge_pages(&input), "first\n\nsecond\n\nthird");
        assert_eq!(merge_pages(&[]), "");
    }

    #[test]
    fn split_then_merge_preserves_text() {
        let text = "Opening line.\n\nMiddle paragraph with words.\n\nClosing thought.";
        let opts = PaginationOptions {
            page_budget: 20,
            ..PaginationOptions::default()
        };
        let pages = split_chapter_to_pages(text, 1, &opts);
        assert_eq!(pages.len(), 3);
        assert_eq!(
            collapse_whitespace(&merge_pages(&pages)),
            collapse_whitespace(text)
        );
    }
}
