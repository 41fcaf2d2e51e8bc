//! Markup stripping for measurement.
//!
//! Page capacity is measured on the text a reader actually sees, so inline
//! tags, embedded images and entities are removed or decoded before any
//! length is taken. The stored page content is never rewritten by this
//! module; it only produces a plain view for counting.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static RE_IMAGE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());
static RE_SVG_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<svg\b.*?</svg\s*>").unwrap());
static RE_ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_IMAGE_TAG_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^<img\b[^>]*>").unwrap());
static RE_SVG_BLOCK_AT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^<svg\b.*?</svg\s*>").unwrap());
static RE_ANY_TAG_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^<[^>]*>").unwrap());

/// Entities decoded before `&amp;`, so an escaped entity stays literal.
const ENTITIES: [(&str, char); 5] = [
    ("&nbsp;", ' '),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];
const AMPERSAND: (&str, char) = ("&amp;", '&');

/// The leading piece of raw text and what it turns into in the plain view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Image or svg markup; removed entirely.
    Hidden { len: usize },
    /// Any other tag; becomes one space.
    Tag { len: usize },
    /// An entity and the character it decodes to.
    Entity { len: usize, decoded: char },
    Char(char),
}

impl Token {
    /// Length in bytes of the raw text this token covers.
    pub fn len(self) -> usize {
        match self {
            Token::Hidden { len } | Token::Tag { len } | Token::Entity { len, .. } => len,
            Token::Char(ch) => ch.len_utf8(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// True when the text carries anything that looks like a tag.
pub fn has_markup(input: &str) -> bool {
    input.contains('<')
}

/// Classify the token at the start of `input`, matching tags and entities
/// the same way [`to_plain_text`] does. `None` once the input is exhausted.
pub fn next_token(input: &str) -> Option<Token> {
    let first = input.chars().next()?;
    match first {
        '<' => {
            if let Some(found) = RE_IMAGE_TAG_AT
                .find(input)
                .or_else(|| RE_SVG_BLOCK_AT.find(input))
            {
                return Some(Token::Hidden { len: found.end() });
            }
            if let Some(found) = RE_ANY_TAG_AT.find(input) {
                return Some(Token::Tag { len: found.end() });
            }
        }
        '&' => {
            let entity = ENTITIES
                .iter()
                .chain(std::iter::once(&AMPERSAND))
                .find(|(entity, _)| input.starts_with(entity));
            if let Some((entity, decoded)) = entity {
                return Some(Token::Entity {
                    len: entity.len(),
                    decoded: *decoded,
                });
            }
        }
        _ => {}
    }
    Some(Token::Char(first))
}

/// Markup pass alone: images and svg removed, other tags turned into one
/// space. Entities and whitespace are left as written.
///
/// Text without markup is returned untouched, like [`to_plain_text`].
pub fn strip_tags(input: &str) -> Cow<'_, str> {
    if !has_markup(input) {
        return Cow::Borrowed(input);
    }

    let mut text = RE_IMAGE_TAG.replace_all(input, "").into_owned();
    text = RE_SVG_BLOCK.replace_all(&text, "").into_owned();
    Cow::Owned(RE_ANY_TAG.replace_all(&text, " ").into_owned())
}

/// Produce the plain-text view of rich text.
///
/// Text without markup is handed back untouched (no whitespace collapsing
/// either), which keeps plain chapters measured exactly as written.
pub fn to_plain_text(input: &str) -> Cow<'_, str> {
    match strip_tags(input) {
        Cow::Borrowed(plain) => Cow::Borrowed(plain),
        Cow::Owned(text) => Cow::Owned(collapse_whitespace(&decode_entities(&text))),
    }
}

/// Decode the handful of entities rich-text editors emit.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = input.to_string();
    for (entity, literal) in ENTITIES {
        out = out.replace(entity, literal.encode_utf8(&mut [0; 4]));
    }
    out.replace(AMPERSAND.0, "&")
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed_unchanged() {
        let input = "  Two  spaces\n\nand a blank line ";
        let out = to_plain_text(input);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, input);
    }

    #[test]
    fn tags_become_single_spaces_and_collapse() {
        let out = to_plain_text("<p>Hello</p><p><strong>bold</strong> world</p>");
        assert_eq!(out, "Hello bold world");
    }

    #[test]
    fn image_markup_contributes_nothing() {
        let payload = "A".repeat(50_000);
        let input = format!(
            "<p>Before</p><IMG src=\"data:image/png;base64,{payload}\" alt=\"x\"><p>after</p>"
        );
        assert_eq!(to_plain_text(&input), "Before after");
    }

    #[test]
    fn svg_blocks_are_dropped_whole() {
        let input = "<p>One</p><svg viewBox=\"0 0 1 1\"><text>hidden</text></svg><p>Two</p>";
        assert_eq!(to_plain_text(input), "One Two");
    }

    #[test]
    fn entities_are_decoded_once() {
        let out = to_plain_text("<p>a&nbsp;&amp;&nbsp;b &lt;tag&gt; &quot;q&quot; &amp;lt;</p>");
        assert_eq!(out, "a & b <tag> \"q\" &lt;");
    }

    #[test]
    fn unmatched_angle_bracket_does_not_panic() {
        assert_eq!(to_plain_text("3 < 4 and   more"), "3 < 4 and more");
        assert_eq!(to_plain_text("<"), "<");
    }

    #[test]
    fn tokens_cover_tags_images_and_entities_whole() {
        let input = "<img src=\"a b\">x<em>&nbsp;&amp;lt;<";
        let mut rest = input;
        let mut tokens = Vec::new();
        while let Some(token) = next_token(rest) {
            tokens.push(token);
            rest = &rest[token.len()..];
        }
        assert_eq!(
            tokens,
            vec![
                Token::Hidden { len: 15 },
                Token::Char('x'),
                Token::Tag { len: 4 },
                Token::Entity { len: 6, decoded: ' ' },
                Token::Entity { len: 5, decoded: '&' },
                Token::Char('l'),
                Token::Char('t'),
                Token::Char(';'),
                Token::Char('<'),
            ]
        );
    }

    #[test]
    fn svg_block_is_one_hidden_token() {
        let input = "<svg><text>hi</text></svg>tail";
        assert_eq!(next_token(input), Some(Token::Hidden { len: 26 }));
        assert_eq!(next_token("<svg open"), Some(Token::Char('<')));
    }

    #[test]
    fn strip_tags_keeps_whitespace_and_entities() {
        assert_eq!(strip_tags("<p>a</p>  <p>b</p>"), " a    b ");
        assert_eq!(strip_tags("<i>x</i>&amp;"), " x &amp;");
        assert!(matches!(strip_tags("plain  &amp; text"), Cow::Borrowed(_)));
    }

    #[test]
    fn whitespace_only_markup_collapses_to_empty() {
        assert_eq!(to_plain_text("<p>   </p>\n<br/>"), "");
    }
}
