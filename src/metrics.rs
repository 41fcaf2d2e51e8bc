//! Length and word-count measurements used for capacity and status.

use crate::markup::{strip_tags, to_plain_text};
use serde::{Deserialize, Serialize};

/// First and last code point of the CJK Unified Ideographs block.
const CJK_START: char = '\u{4E00}';
const CJK_END: char = '\u{9FFF}';

/// Both measurements for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub effective_length: usize,
    pub word_count: usize,
}

impl TextMetrics {
    pub fn measure(content: &str) -> Self {
        let plain = to_plain_text(content);
        Self {
            effective_length: plain.chars().count(),
            word_count: count_words_plain(&plain),
        }
    }
}

pub fn is_cjk(ch: char) -> bool {
    (CJK_START..=CJK_END).contains(&ch)
}

/// Character count of the markup-stripped text.
pub fn effective_length(content: &str) -> usize {
    to_plain_text(content).chars().count()
}

/// Character count after the markup pass alone, before entity decoding and
/// whitespace collapsing.
///
/// Never smaller than [`effective_length`]. For two pages joined by a
/// separator it is the sum of both sides plus the separator, so it only grows
/// as pages are appended.
pub fn spread_length(content: &str) -> usize {
    strip_tags(content).chars().count()
}

/// Script-aware word count.
///
/// Every CJK ideograph counts as one word; whatever remains is split on
/// whitespace. Ideographs are replaced by a space before the second pass so
/// Latin runs on either side of them stay separate tokens.
pub fn word_count(content: &str) -> usize {
    count_words_plain(&to_plain_text(content))
}

fn count_words_plain(plain: &str) -> usize {
    let cjk = plain.chars().filter(|ch| is_cjk(*ch)).count();
    if cjk == 0 {
        return plain.split_whitespace().count();
    }

    let remainder: String = plain
        .chars()
        .map(|ch| if is_cjk(ch) { ' ' } else { ch })
        .collect();
    cjk + remainder.split_whitespace().count()
}
