/*!
 * Tests for the masking pass
 */

use docwai::app_config::ProcessingConfig;
use docwai::errors::FormatError;
use docwai::extractor::{extract, validate_front_matter};
use docwai::snippet;

use crate::common;

fn processing() -> ProcessingConfig {
    ProcessingConfig::default()
}

/// Validation rejects an empty document
#[test]
fn test_validate_withEmptyDocument_shouldFail() {
    assert_eq!(
        validate_front_matter("   \n  "),
        Err(FormatError::EmptyDocument)
    );
}

/// Validation rejects a document that does not open with the delimiter
#[test]
fn test_validate_withMissingOpeningDelimiter_shouldFail() {
    assert_eq!(
        validate_front_matter("id: page\n---\nBody"),
        Err(FormatError::MissingOpeningDelimiter)
    );
}

/// Validation rejects a document with no closing delimiter
#[test]
fn test_validate_withMissingClosingDelimiter_shouldFail() {
    assert_eq!(
        validate_front_matter("---\nid: page\nBody"),
        Err(FormatError::MissingClosingDelimiter)
    );
}

/// Validation rejects a document with nothing after the front matter
#[test]
fn test_validate_withEmptyBody_shouldFail() {
    assert_eq!(
        validate_front_matter("---\nid: page\n---\n   \n"),
        Err(FormatError::EmptyBody)
    );
}

/// Validation rejects a header line that is not name: value
#[test]
fn test_validate_withMalformedHeaderLine_shouldFail() {
    let result = validate_front_matter("---\nid page without colon\n---\nBody");
    assert!(matches!(
        result,
        Err(FormatError::MalformedHeaderLine { .. })
    ));
}

/// Validation accepts a well-formed document
#[test]
fn test_validate_withWellFormedDocument_shouldSucceed() {
    assert!(validate_front_matter(&common::sample_document()).is_ok());
}

/// The front matter disappears from the masked text and is stored under
/// the fixed header token
#[test]
fn test_extract_withFrontMatter_shouldStoreHeaderSnippet() {
    let raw = common::minimal_document();
    let masked = extract(&raw, &processing()).unwrap();

    assert!(!masked.text.contains("---"));
    assert!(!masked.text.contains("id: page"));

    let header = masked
        .snippets
        .iter()
        .find(|s| s.id == snippet::header_token())
        .expect("header snippet present");
    assert_eq!(header.code, "---\nid: page\n---");
}

/// Fenced code blocks are replaced by the code token series, verbatim
/// content preserved in the snippet
#[test]
fn test_extract_withCodeBlock_shouldMaskIt() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    assert!(!masked.text.contains("```"));
    assert!(masked.text.contains("<notranslate>cx_spt_0</notranslate>"));

    let code = masked
        .snippets
        .iter()
        .find(|s| s.id.contains("cx_spt_0"))
        .expect("code snippet present");
    assert_eq!(code.code, "```bash\ncargo install docwai\n```");
}

/// Multiple code blocks get sequential indices in scan order
#[test]
fn test_extract_withMultipleCodeBlocks_shouldNumberSequentially() {
    let raw = "---\nid: x\n---\nFirst:\n```a\none\n```\nSecond:\n```b\ntwo\n```\n";
    let masked = extract(raw, &processing()).unwrap();

    let first = masked.text.find("cx_spt_0").expect("first token");
    let second = masked.text.find("cx_spt_1").expect("second token");
    assert!(first < second);
}

/// A contiguous run of pipe-table lines collapses into a single token
#[test]
fn test_extract_withTable_shouldMaskWholeRun() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    assert!(!masked.text.contains("| Option |"));
    assert!(masked.text.contains("<notranslate>tz_spt_0</notranslate>"));

    let table = masked
        .snippets
        .iter()
        .find(|s| s.id.contains("tz_spt_0"))
        .expect("table snippet present");
    assert!(table.code.starts_with("| Option |"));
    assert_eq!(table.code.lines().count(), 3);
}

/// A table still open at end of document goes to the trailing-table series
#[test]
fn test_extract_withTrailingTable_shouldUseTrailingSeries() {
    let raw = "---\nid: x\n---\nIntro.\n| a | b |\n| - | - |\n| 1 | 2 |";
    let masked = extract(raw, &processing()).unwrap();

    assert!(masked.text.contains("<notranslate>tl_spt_0</notranslate>"));
    assert!(masked
        .snippets
        .iter()
        .any(|s| s.id.contains("tl_spt_0") && s.code.lines().count() == 3));
}

/// Tab markup opening tags are masked as whole lines, indentation included
#[test]
fn test_extract_withTabMarkup_shouldMaskOpeningTags() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    assert!(!masked.text.contains("<Tabs groupId"));
    assert!(!masked.text.contains("<TabItem value"));
    assert!(masked.text.contains("<notranslate>Tabs_0</notranslate>"));
    assert!(masked.text.contains("<notranslate>TabItem_0</notranslate>"));

    // Closing tags carry no attributes and stay in place
    assert!(masked.text.contains("</TabItem>"));
    assert!(masked.text.contains("</Tabs>"));
}

/// Indented tab markup keeps its leading whitespace inside the snippet
#[test]
fn test_extract_withIndentedTabItem_shouldKeepIndentation() {
    let raw = "---\nid: x\n---\nBody.\n  <TabItem value=\"a\" label=\"A\">\n";
    let masked = extract(raw, &processing()).unwrap();

    let item = masked
        .snippets
        .iter()
        .find(|s| s.id.contains("TabItem_0"))
        .expect("tab item snippet present");
    assert_eq!(item.code, "  <TabItem value=\"a\" label=\"A\">");
}

/// Admonition blocks are masked whole, kind keyword and body included
#[test]
fn test_extract_withAdmonition_shouldMaskBlock() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    assert!(!masked.text.contains(":::note"));
    assert!(masked.text.contains("<notranslate>admonition_0</notranslate>"));

    let admonition = masked
        .snippets
        .iter()
        .find(|s| s.id.contains("admonition_0"))
        .expect("admonition snippet present");
    assert!(admonition.code.starts_with(":::note"));
    assert!(admonition.code.ends_with(":::"));
    assert!(admonition.code.contains("Remember to set your API key."));
}

/// An unknown admonition kind is left untouched
#[test]
fn test_extract_withUnknownAdmonitionKind_shouldLeaveIt() {
    let raw = "---\nid: x\n---\nBody.\n:::custom\nText.\n:::\n";
    let masked = extract(raw, &processing()).unwrap();

    assert!(masked.text.contains(":::custom"));
    assert!(!masked.snippets.iter().any(|s| s.id.contains("admonition_")));
}

/// Reserved keywords in the body are wrapped in protection markers
#[test]
fn test_extract_withReservedKeyword_shouldProtectIt() {
    let raw = "---\nid: x\n---\nSet the title: field in the front matter.\n";
    let masked = extract(raw, &processing()).unwrap();

    assert!(masked
        .text
        .contains("<notranslate>title:</notranslate>"));
    assert!(!masked.text.contains(" title: "));
}

/// Keyword protection never double-wraps an already protected occurrence
#[test]
fn test_protectKeywords_appliedTwice_shouldBeIdempotent() {
    let keywords = vec!["title:".to_string()];
    let once = snippet::protect_keywords("Set title: here", &keywords);
    let twice = snippet::protect_keywords(&once, &keywords);
    assert_eq!(once, twice);
}

/// Category counters stay independent: one of each kind all get index zero
#[test]
fn test_extract_withMixedContent_shouldKeepIndependentCounters() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    for prefix in ["cx_spt_0", "tz_spt_0", "Tabs_0", "TabItem_0", "admonition_0"] {
        assert!(
            masked.snippets.iter().any(|s| s.id.contains(prefix)),
            "missing snippet for {}",
            prefix
        );
    }
}

/// Every token in a document is distinct, even across repeated categories
/// and duplicated content
#[test]
fn test_extract_withRepeatedCategories_shouldKeepAllTokensUnique() {
    let raw = "---\nid: x\n---\n\
        First:\n```a\nsame code\n```\n\
        Second:\n```a\nsame code\n```\n\
        | a | b |\n| - | - |\n\nProse.\n\
        :::note\nOne.\n:::\n\
        :::tip\nTwo.\n:::\n\
        | a | b |\n| - | - |";
    let masked = extract(raw, &processing()).unwrap();

    let ids: Vec<&str> = masked.snippets.iter().map(|s| s.id.as_str()).collect();
    let distinct: std::collections::HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), distinct.len(), "duplicate token id in {:?}", ids);

    // Duplicate code blocks and the trailing table still get their own ids
    assert!(ids.iter().any(|id| id.contains("cx_spt_1")));
    assert!(ids.iter().any(|id| id.contains("tl_spt_0")));
}
