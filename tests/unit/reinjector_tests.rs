/*!
 * Tests for the restoration pass
 */

use docwai::app_config::ProcessingConfig;
use docwai::errors::ReinjectError;
use docwai::extractor::extract;
use docwai::reinjector::{reinject, rewrite_asset_paths};
use docwai::snippet;

use crate::common;

fn processing() -> ProcessingConfig {
    ProcessingConfig::default()
}

/// Simulate the translation normalization step: the masked body comes back
/// untouched, with the header token restored as the first line.
fn identity_translation(masked_body: &str) -> String {
    format!("{}\n{}", snippet::header_token(), masked_body.trim())
}

/// Masking followed by an identity translation and restoration yields the
/// original document, modulo the asset-path rewrite and outer whitespace
#[test]
fn test_reinject_afterIdentityTranslation_shouldRoundTrip() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    let translated = identity_translation(&masked.text);
    let restored = reinject(&translated, &masked.snippets, &processing()).unwrap();

    let expected = rewrite_asset_paths(raw.trim(), &processing());
    assert_eq!(restored, expected);
}

/// A minimal document round-trips exactly
#[test]
fn test_reinject_withMinimalDocument_shouldRoundTrip() {
    let raw = common::minimal_document();
    let masked = extract(&raw, &processing()).unwrap();

    let translated = identity_translation(&masked.text);
    let restored = reinject(&translated, &masked.snippets, &processing()).unwrap();

    assert_eq!(restored, raw.trim());
}

/// A token duplicated by the translation step is expanded at every
/// occurrence
#[test]
fn test_reinject_withDuplicatedToken_shouldExpandAll() {
    let raw = "---\nid: x\n---\nBefore.\n```rs\nlet x = 1;\n```\nAfter.\n";
    let masked = extract(raw, &processing()).unwrap();

    let code_token = snippet::SnippetKind::CodeBlock.token(0);
    let duplicated = format!("{}\n{}", masked.text.trim(), code_token);
    let translated = identity_translation(&duplicated);

    let restored = reinject(&translated, &masked.snippets, &processing()).unwrap();
    assert_eq!(restored.matches("let x = 1;").count(), 2);
}

/// Losing the header token means the restored text cannot start with the
/// front-matter delimiter
#[test]
fn test_reinject_withMissingHeaderToken_shouldFailCorruptHeader() {
    let raw = common::minimal_document();
    let masked = extract(&raw, &processing()).unwrap();

    // No normalization step: the translated text lacks the header token
    let result = reinject(masked.text.trim(), &masked.snippets, &processing());
    assert!(matches!(result, Err(ReinjectError::CorruptHeader { .. })));
}

/// A token the translation mangled survives substitution and is detected
/// as a leaked marker
#[test]
fn test_reinject_withMangledToken_shouldFailLeakedMarker() {
    let raw = "---\nid: x\n---\nBefore.\n```rs\nlet x = 1;\n```\nAfter.\n";
    let masked = extract(raw, &processing()).unwrap();

    let mangled = masked.text.replace("cx_spt_0", "cx_tps_0");
    let translated = identity_translation(&mangled);

    let result = reinject(&translated, &masked.snippets, &processing());
    assert!(matches!(result, Err(ReinjectError::LeakedMarker { .. })));
}

/// Keyword protection markers are stripped, the literal keyword stays
#[test]
fn test_reinject_withProtectedKeyword_shouldStripMarkers() {
    let raw = "---\nid: x\n---\nSet the title: field carefully.\n";
    let masked = extract(raw, &processing()).unwrap();

    let translated = identity_translation(&masked.text);
    let restored = reinject(&translated, &masked.snippets, &processing()).unwrap();

    assert!(restored.contains("title: field"));
    assert!(!restored.contains("<notranslate>"));
}

/// The static-asset prefix is rewritten to its relative form
#[test]
fn test_reinject_withAssetPath_shouldRewritePrefix() {
    let raw = common::sample_document();
    let masked = extract(&raw, &processing()).unwrap();

    let translated = identity_translation(&masked.text);
    let restored = reinject(&translated, &masked.snippets, &processing()).unwrap();

    assert!(restored.contains("/../../apps/main-app/static/images/diagram.png"));
    assert!(!restored.contains("](/apps/main-app/static/images/"));
}

/// The asset rewrite is a plain substitution, applied to every occurrence
#[test]
fn test_rewriteAssetPaths_withMultipleOccurrences_shouldRewriteAll() {
    let text = "![a](/apps/main-app/static/images/a.png) ![b](/apps/main-app/static/images/b.png)";
    let rewritten = rewrite_asset_paths(text, &processing());

    assert_eq!(rewritten.matches("/../../apps/main-app/static/images/").count(), 2);
}

/// An empty configured prefix disables the rewrite
#[test]
fn test_rewriteAssetPaths_withEmptyPrefix_shouldBeNoOp() {
    let mut config = processing();
    config.asset_path_prefix = String::new();

    let text = "![a](/apps/main-app/static/images/a.png)";
    assert_eq!(rewrite_asset_paths(text, &config), text);
}

/// Code block interiors come back byte-for-byte even when the surrounding
/// prose was rewritten
#[test]
fn test_reinject_withRewrittenProse_shouldPreserveSnippetBytes() {
    let raw = "---\nid: x\n---\nRun this:\n```bash\necho \"don't touch\"  # trailing\n```\nDone.\n";
    let masked = extract(raw, &processing()).unwrap();

    // Simulated translation rewrites the prose but keeps tokens intact
    let rewritten = masked
        .text
        .replace("Run this:", "Lancez ceci :")
        .replace("Done.", "Termine.");
    let translated = identity_translation(&rewritten);

    let restored = reinject(&translated, &masked.snippets, &processing()).unwrap();
    assert!(restored.contains("echo \"don't touch\"  # trailing"));
    assert!(restored.contains("Lancez ceci :"));
}
