/*!
 * Unmasking pass: restores a masked-and-translated document.
 *
 * Every placeholder token is substituted back to its original content,
 * reserved-keyword protection markers are stripped, and the result is
 * validated before the final asset-path rewrite. All substitutions are pure
 * literal string replacement; token and content text are never interpreted
 * as patterns.
 */

use crate::app_config::ProcessingConfig;
use crate::errors::ReinjectError;
use crate::snippet::{self, Snippet};

/// Restore a masked document from its snippet list.
///
/// Pure; the caller decides where the restored text is written. Fails when
/// the translated text no longer carries an intact header token or when a
/// protection marker survives substitution, both of which mean the
/// translation step broke the round trip.
pub fn reinject(
    masked: &str,
    snippets: &[Snippet],
    processing: &ProcessingConfig,
) -> Result<String, ReinjectError> {
    let mut restored = masked.to_string();

    // Token substitution is exhaustive: a token duplicated by the translation
    // step is expanded at every occurrence. str::replace is literal, so no
    // metacharacter in a token or its content can change the result.
    for snippet in snippets {
        restored = restored.replace(&snippet.id, &snippet.code);
    }

    restored = snippet::strip_keyword_protection(&restored, &processing.reserved_keywords);
    let restored = restored.trim().to_string();

    if !restored.starts_with("---") {
        return Err(ReinjectError::CorruptHeader {
            head: restored.chars().take(20).collect(),
        });
    }

    let restored = rewrite_asset_paths(&restored, processing);

    if let Some(excerpt) = snippet::leaked_marker_excerpt(&restored) {
        return Err(ReinjectError::LeakedMarker { excerpt });
    }

    Ok(restored)
}

/// Rewrite the fixed static-asset path prefix to its relative form.
///
/// A plain string substitution, independent of anything the translation step
/// did to the surrounding prose.
pub fn rewrite_asset_paths(text: &str, processing: &ProcessingConfig) -> String {
    if processing.asset_path_prefix.is_empty() {
        return text.to_string();
    }
    text.replace(&processing.asset_path_prefix, &processing.asset_path_replacement)
}
