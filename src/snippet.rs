/*!
 * Shared snippet and protection-marker utilities.
 *
 * A snippet is one (token, original content) pair produced while masking a
 * document. Tokens are framed by a marker pair that the translation prompt
 * instructs the model to leave untouched, so they survive the lossy
 * translation step as literal text.
 */

use serde::{Deserialize, Serialize};

/// Opening protection marker
pub const MARKER_OPEN: &str = "<notranslate>";

/// Closing protection marker
pub const MARKER_CLOSE: &str = "</notranslate>";

/// Identifier of the front-matter header snippet (one per document)
pub const HEADER_TOKEN_ID: &str = "meta_header";

/// A protected fragment extracted from a document.
///
/// `id` is the placeholder token as it appears in the masked text, `code` is
/// the exact original text it stands in for, byte for byte. The `id`/`code`
/// field names are the stable contract of the persisted snippet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Placeholder token, unique within one document's snippet set
    pub id: String,

    /// Verbatim original content, including whitespace
    pub code: String,
}

impl Snippet {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Snippet {
            id: id.into(),
            code: code.into(),
        }
    }
}

/// Categories of protected content, each with its own token series.
///
/// Counters are independent per category; uniqueness only has to hold across
/// one document's full snippet set, which the disjoint prefixes guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    /// Front-matter header block
    Header,
    /// Fenced code block
    CodeBlock,
    /// Pipe-table line run closed before end of document
    Table,
    /// Pipe-table line run still open at end of document
    TrailingTable,
    /// Single-line tab-item opening tag
    TabItem,
    /// Single-line tab-container opening tag
    TabContainer,
    /// Admonition callout block
    Admonition,
}

impl SnippetKind {
    /// Token series prefix for this category
    fn prefix(self) -> &'static str {
        match self {
            SnippetKind::Header => HEADER_TOKEN_ID,
            SnippetKind::CodeBlock => "cx_spt_",
            SnippetKind::Table => "tz_spt_",
            SnippetKind::TrailingTable => "tl_spt_",
            SnippetKind::TabItem => "TabItem_",
            SnippetKind::TabContainer => "Tabs_",
            SnippetKind::Admonition => "admonition_",
        }
    }

    /// Build the marker-framed token for the `index`-th snippet of this kind
    pub fn token(self, index: usize) -> String {
        match self {
            SnippetKind::Header => wrap(HEADER_TOKEN_ID),
            _ => wrap(&format!("{}{}", self.prefix(), index)),
        }
    }
}

/// Frame `inner` with the protection marker pair
pub fn wrap(inner: &str) -> String {
    format!("{}{}{}", MARKER_OPEN, inner, MARKER_CLOSE)
}

/// The fixed token that stands in for the front-matter header
pub fn header_token() -> String {
    wrap(HEADER_TOKEN_ID)
}

/// Wrap every literal occurrence of each reserved keyword in protection
/// markers.
///
/// The operation is idempotent: occurrences that are already wrapped are left
/// alone, so applying keyword protection twice never double-wraps.
pub fn protect_keywords(text: &str, keywords: &[String]) -> String {
    // NUL never appears in well-formed UTF-8 documents, safe as a sentinel.
    const SENTINEL: &str = "\u{0}kw\u{0}";

    let mut result = text.to_string();
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        let wrapped = wrap(keyword);
        result = result.replace(&wrapped, SENTINEL);
        result = result.replace(keyword.as_str(), &wrapped);
        result = result.replace(SENTINEL, &wrapped);
    }
    result
}

/// Remove the protection-marker wrapping from every reserved keyword,
/// leaving the literal word in place.
pub fn strip_keyword_protection(text: &str, keywords: &[String]) -> String {
    let mut result = text.to_string();
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        let wrapped = wrap(keyword);
        result = result.replace(&wrapped, keyword);
    }
    result
}

/// Return an excerpt around the first protection marker left in `text`,
/// or `None` if the text is marker-free.
pub fn leaked_marker_excerpt(text: &str) -> Option<String> {
    let position = text
        .find(MARKER_OPEN)
        .into_iter()
        .chain(text.find(MARKER_CLOSE))
        .min()?;

    // Clamp to char boundaries so the excerpt never splits a code point.
    let mut start = position.saturating_sub(30);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (position + 50).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    Some(text[start..end].to_string())
}
