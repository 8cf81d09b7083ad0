/*!
 * Masking pass: turns a raw Markdown/MDX document into a masked document.
 *
 * Protected regions (front matter, fenced code blocks, pipe tables, tab
 * markup, admonition blocks) are replaced by inert placeholder tokens and
 * collected as snippets; reserved keywords are wrapped in protection markers
 * in place. The passes run in a fixed order and every pattern is matched
 * against the immutable original text while replacements land in a separate
 * working copy. The order is a hard contract: the early passes never reorder
 * lines, which is what keeps the later line-anchored patterns valid.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ProcessingConfig;
use crate::errors::FormatError;
use crate::snippet::{self, Snippet, SnippetKind};

// Fenced code block including its language tag, non-greedy across lines
static CODE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```.*?```").unwrap()
});

// Tab-item opening tag anchored at start of line, leading indentation kept
static TAB_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*<TabItem\s.*$").unwrap()
});

// Tab-container opening tag anchored at start of line
static TAB_CONTAINER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*<Tabs\s.*$").unwrap()
});

// Admonition block with a fixed kind set, possibly spanning multiple lines
static ADMONITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ms)^([ \t]*):::(note|tip|info|warning|danger|sharedCloudDanger|caution|starterNote|privateCloudNote)(.*?):::$",
    )
    .unwrap()
});

// Front-matter header line: name restricted to alphanumerics/hyphen/underscore
static HEADER_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+:\s?.*$").unwrap()
});

/// A document after masking: the working text with tokens in place of
/// protected content, plus the snippet list needed to restore it.
#[derive(Debug, Clone)]
pub struct MaskedDocument {
    /// Masked text, safe to hand to a lossy translation step
    pub text: String,

    /// Snippets in extraction order (categories keep independent counters)
    pub snippets: Vec<Snippet>,
}

/// Validate the structural preconditions of a raw document.
///
/// Runs before any masking pass; a failing document is never translated.
pub fn validate_front_matter(raw: &str) -> Result<(), FormatError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(FormatError::EmptyDocument);
    }

    let lines: Vec<&str> = content.lines().collect();
    if lines[0].trim() != "---" {
        return Err(FormatError::MissingOpeningDelimiter);
    }

    let closing_index = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == "---")
        .map(|(index, _)| index)
        .ok_or(FormatError::MissingClosingDelimiter)?;

    let body = lines[closing_index + 1..].join("\n");
    if body.trim().is_empty() {
        return Err(FormatError::EmptyBody);
    }

    for line in &lines[1..closing_index] {
        if !line.trim().is_empty() && !HEADER_LINE_REGEX.is_match(line.trim()) {
            return Err(FormatError::MalformedHeaderLine {
                line: (*line).to_string(),
            });
        }
    }

    Ok(())
}

/// Mask a raw document.
///
/// Returns the masked text and the ordered snippet list. Pure; persisting the
/// results for retry resilience is the caller's concern.
pub fn extract(raw: &str, processing: &ProcessingConfig) -> Result<MaskedDocument, FormatError> {
    validate_front_matter(raw)?;

    let mut snippets = Vec::new();
    let mut working = raw.to_string();

    extract_header(raw, &mut working, &mut snippets);
    extract_code_blocks(raw, &mut working, &mut snippets);
    extract_tables(raw, &mut working, &mut snippets);
    extract_line_tags(raw, &mut working, &mut snippets, SnippetKind::TabItem);
    extract_line_tags(raw, &mut working, &mut snippets, SnippetKind::TabContainer);
    extract_admonitions(raw, &mut working, &mut snippets);

    working = snippet::protect_keywords(&working, &processing.reserved_keywords);

    Ok(MaskedDocument {
        text: working,
        snippets,
    })
}

/// Pass 1: remove the front-matter block and record it under the fixed
/// header token. The removal consumes the block's trailing newline, while
/// the stored snippet ends at the closing delimiter; translation
/// normalization re-adds exactly one newline after the header token, so
/// reinjection restores the original line structure.
fn extract_header(raw: &str, working: &mut String, snippets: &mut Vec<Snippet>) {
    let Some((start, end)) = front_matter_range(raw) else {
        return;
    };

    let block = raw[start..end]
        .strip_suffix('\n')
        .map(|b| b.strip_suffix('\r').unwrap_or(b))
        .unwrap_or(&raw[start..end]);
    snippets.push(Snippet::new(snippet::header_token(), block));
    // Pass 1 runs first, so offsets into the original are still valid here.
    working.replace_range(start..end, "");
}

/// Byte range of the front-matter block, including its trailing newline.
fn front_matter_range(raw: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    let mut start = None;

    for line in raw.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim() != "---" {
            continue;
        }
        match start {
            None => start = Some(line_start),
            Some(block_start) => return Some((block_start, offset)),
        }
    }
    None
}

/// Pass 2: fenced code blocks, one snippet per block in scan order.
fn extract_code_blocks(raw: &str, working: &mut String, snippets: &mut Vec<Snippet>) {
    for (index, matched) in CODE_BLOCK_REGEX.find_iter(raw).enumerate() {
        let token = SnippetKind::CodeBlock.token(index);
        snippets.push(Snippet::new(&token, matched.as_str()));
        *working = working.replacen(matched.as_str(), &token, 1);
    }
}

/// Pass 3: maximal runs of pipe-table lines, one snippet per run.
///
/// A run still open at end of document is emitted under the distinct
/// trailing-table token series so trailing tables are never lost.
fn extract_tables(raw: &str, working: &mut String, snippets: &mut Vec<Snippet>) {
    let mut run: Vec<&str> = Vec::new();
    let mut table_index = 0;

    let mut close_run = |run: &mut Vec<&str>, kind: SnippetKind, working: &mut String| {
        let table_text = run.join("\n");
        let token = kind.token(table_index);
        snippets.push(Snippet::new(&token, &table_text));
        *working = working.replacen(&table_text, &token, 1);
        table_index += 1;
        run.clear();
    };

    for line in raw.lines() {
        if line.trim_start().starts_with('|') {
            run.push(line);
        } else if !run.is_empty() {
            close_run(&mut run, SnippetKind::Table, working);
        }
    }
    if !run.is_empty() {
        close_run(&mut run, SnippetKind::TrailingTable, working);
    }
}

/// Pass 4: single-line tab-item / tab-container opening tags.
fn extract_line_tags(
    raw: &str,
    working: &mut String,
    snippets: &mut Vec<Snippet>,
    kind: SnippetKind,
) {
    let regex = match kind {
        SnippetKind::TabItem => &*TAB_ITEM_REGEX,
        SnippetKind::TabContainer => &*TAB_CONTAINER_REGEX,
        _ => unreachable!("extract_line_tags only handles tab markup"),
    };

    for (index, matched) in regex.find_iter(raw).enumerate() {
        let token = kind.token(index);
        snippets.push(Snippet::new(&token, matched.as_str()));
        *working = working.replacen(matched.as_str(), &token, 1);
    }
}

/// Pass 5: admonition blocks, leading indentation and kind keyword preserved.
fn extract_admonitions(raw: &str, working: &mut String, snippets: &mut Vec<Snippet>) {
    for (index, captures) in ADMONITION_REGEX.captures_iter(raw).enumerate() {
        let matched = captures.get(0).map_or("", |m| m.as_str());
        let token = SnippetKind::Admonition.token(index);
        snippets.push(Snippet::new(&token, matched));
        *working = working.replacen(matched, &token, 1);
    }
}
