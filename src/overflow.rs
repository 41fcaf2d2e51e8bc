//! Splitting a page whose content no longer fits its paper format.
//!
//! The split point is chosen by a cascade of boundary finders, most
//! meaning-preserving first: blank line, sentence end, whitespace. Each
//! finder reports the last boundary before the fragment would outgrow
//! `limit` and the cascade accepts it only if it lies far enough into the
//! window to avoid a near-empty fragment. When nothing qualifies the text is
//! cut at the last point that still fits, which always makes progress.
//!
//! Lengths are effective lengths: markup counts as what it becomes in the
//! plain view, and no cut ever lands inside a tag or an entity.

use crate::markup::{Token, next_token};
use crate::metrics::effective_length;
use serde::Serialize;
use tracing::{trace, warn};

/// Where a fragment was cut from the text that followed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    Paragraph,
    Sentence,
    Word,
    /// No acceptable boundary; cut mid-token at the limit.
    HardCut,
    /// Final fragment, nothing follows.
    End,
}

/// One piece of split content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub content: String,
    pub boundary: Boundary,
}

impl Fragment {
    pub fn was_hard_cut(&self) -> bool {
        self.boundary == Boundary::HardCut
    }
}

impl Boundary {
    /// Finders tried in order before falling back to a hard cut.
    pub const CASCADE: [Boundary; 3] = [Boundary::Paragraph, Boundary::Sentence, Boundary::Word];

    /// A found position must lie strictly past this share of the limit.
    pub fn min_percent(self) -> usize {
        match self {
            Boundary::Paragraph => 50,
            Boundary::Sentence => 30,
            Boundary::Word => 50,
            Boundary::HardCut | Boundary::End => 0,
        }
    }

    pub fn accepts(self, position: usize, limit: usize) -> bool {
        position.saturating_mul(100) > limit.saturating_mul(self.min_percent())
    }

    /// Last boundary of this kind at or before character position `reach`,
    /// as the number of characters that would go into the fragment.
    ///
    /// `window` holds the leading characters of the text; it may be a couple
    /// of characters longer than `reach` so that a boundary sitting exactly
    /// on it can be seen.
    pub fn find(self, window: &[char], reach: usize) -> Option<usize> {
        match self {
            Boundary::Paragraph => find_paragraph_break(window, reach),
            Boundary::Sentence => find_sentence_end(window, reach),
            Boundary::Word => find_word_break(window, reach),
            Boundary::HardCut => Some(reach.min(window.len())),
            Boundary::End => None,
        }
    }
}

fn find_paragraph_break(window: &[char], limit: usize) -> Option<usize> {
    let last = limit.min(window.len().saturating_sub(1));
    (1..=last).rev().find(|&idx| {
        if window[idx] != '\n' {
            return false;
        }
        window[idx + 1..]
            .iter()
            .find(|ch| !matches!(ch, ' ' | '\t' | '\r'))
            .is_some_and(|ch| *ch == '\n')
    })
}

fn find_sentence_end(window: &[char], limit: usize) -> Option<usize> {
    let last = limit.min(window.len());
    (0..last).rev().find_map(|idx| {
        let terminated = match window[idx] {
            '。' | '！' | '？' => true,
            '.' | '!' | '?' => window.get(idx + 1).is_some_and(|next| next.is_whitespace()),
            _ => false,
        };
        terminated.then_some(idx + 1)
    })
}

fn find_word_break(window: &[char], limit: usize) -> Option<usize> {
    let last = limit.min(window.len().saturating_sub(1));
    (1..=last).rev().find(|&idx| window[idx].is_whitespace())
}

/// Split content into fragments that each fit `limit` effective characters.
pub fn split_overflow(content: &str, limit: usize) -> Vec<String> {
    split_overflow_detailed(content, limit)
        .into_iter()
        .map(|fragment| fragment.content)
        .collect()
}

/// Like [`split_overflow`], but reports which boundary ended each fragment.
///
/// Content that already fits is returned verbatim as a single fragment.
/// Fragments produced by a split are trimmed. Cuts never land inside a tag
/// or an entity.
pub fn split_overflow_detailed(content: &str, limit: usize) -> Vec<Fragment> {
    let limit = limit.max(1);
    if effective_length(content) <= limit {
        return vec![Fragment {
            content: content.to_string(),
            boundary: Boundary::End,
        }];
    }

    let mut fragments = Vec::new();
    let mut rest = content.trim();

    while !rest.is_empty() {
        if effective_length(rest) <= limit {
            fragments.push(Fragment {
                content: rest.to_string(),
                boundary: Boundary::End,
            });
            break;
        }

        let window = Window::scan(rest, limit);
        let (position, boundary) = choose_split(&window, limit);
        let byte_offset = rest
            .char_indices()
            .nth(position)
            .map_or(rest.len(), |(offset, _)| offset);
        let (head, tail) = rest.split_at(byte_offset);

        let head = head.trim();
        if !head.is_empty() {
            fragments.push(Fragment {
                content: head.to_string(),
                boundary,
            });
        }
        rest = tail.trim();
    }

    if let Some(last) = fragments.last_mut() {
        last.boundary = Boundary::End;
    }
    fragments
}

/// Stand-in for characters inside tags and entities; never a boundary.
const MASKED: char = '\u{FFFC}';
/// Raw characters kept past `reach` so finders can see what follows it.
const LOOKAHEAD: usize = 2;

/// What a token contributes to the collapsed plain view.
enum Plain {
    Visible,
    Space,
    Nothing,
}

impl Plain {
    fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            Plain::Space
        } else {
            Plain::Visible
        }
    }
}

/// The leading stretch of text a fragment can be cut from.
struct Window {
    /// Raw characters with markup and entities masked.
    chars: Vec<char>,
    /// Effective length of the fragment that would end at each character
    /// position, for positions between tokens.
    measure: Vec<Option<usize>>,
    /// Furthest position whose fragment still fits.
    reach: usize,
    /// End of the first token, the shortest possible cut.
    first_cut: usize,
}

impl Window {
    /// Walk `rest` token by token, measuring each prefix as a fragment would
    /// be measured: raw characters until markup appears, collapsed plain
    /// characters after.
    fn scan(rest: &str, limit: usize) -> Self {
        let mut window = Window {
            chars: Vec::new(),
            measure: vec![Some(0)],
            reach: 0,
            first_cut: 0,
        };
        let mut raw = 0usize;
        let mut collapsed = 0usize;
        let mut pending_space = false;
        let mut markup = false;
        let mut full = false;
        let mut offset = 0usize;

        while let Some(token) = next_token(&rest[offset..]) {
            let text = &rest[offset..offset + token.len()];
            offset += token.len();
            let width = text.chars().count();
            raw += width;

            let plain = match token {
                Token::Char(ch) => {
                    window.chars.push(ch);
                    markup |= ch == '<';
                    Plain::of(ch)
                }
                Token::Hidden { .. } => {
                    window.chars.extend(std::iter::repeat_n(MASKED, width));
                    markup = true;
                    Plain::Nothing
                }
                Token::Tag { .. } => {
                    window.chars.extend(std::iter::repeat_n(MASKED, width));
                    markup = true;
                    Plain::Space
                }
                Token::Entity { decoded, .. } => {
                    window.chars.extend(std::iter::repeat_n(MASKED, width));
                    Plain::of(decoded)
                }
            };
            match plain {
                Plain::Visible => {
                    if pending_space && collapsed > 0 {
                        collapsed += 1;
                    }
                    pending_space = false;
                    collapsed += 1;
                }
                Plain::Space => pending_space = true,
                Plain::Nothing => {}
            }

            window.measure.extend(std::iter::repeat_n(None, width - 1));
            if window.first_cut == 0 {
                window.first_cut = window.chars.len();
            }
            if !full {
                let length = if markup { collapsed } else { raw };
                if length <= limit {
                    window.measure.push(Some(length));
                    window.reach = window.chars.len();
                    continue;
                }
                full = true;
            }
            window.measure.push(None);
            if window.chars.len() >= window.reach + LOOKAHEAD {
                break;
            }
        }
        window
    }

    fn measure_at(&self, position: usize) -> Option<usize> {
        self.measure.get(position).copied().flatten()
    }
}

fn choose_split(window: &Window, limit: usize) -> (usize, Boundary) {
    for boundary in Boundary::CASCADE {
        let Some(position) = boundary.find(&window.chars, window.reach) else {
            continue;
        };
        match window.measure_at(position) {
            Some(length) if boundary.accepts(length, limit) => {
                trace!(?boundary, position, length, limit, "Chose split boundary");
                return (position, boundary);
            }
            length => {
                trace!(?boundary, position, ?length, limit, "Boundary too early; trying next tier");
            }
        }
    }

    let position = if window.reach > 0 {
        window.reach
    } else {
        window.first_cut
    };
    warn!(limit, position, "No usable boundary; hard cutting page content");
    (position, Boundary::HardCut)
}
