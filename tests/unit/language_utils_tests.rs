/*!
 * Tests for language code utilities
 */

use docwai::language_utils::{get_language_name, language_codes_match, normalize_to_part2t};

/// Two-letter codes normalize to their three-letter form
#[test]
fn test_normalize_withTwoLetterCode_shouldReturnPart2t() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
}

/// Bibliographic three-letter codes map to their terminological form
#[test]
fn test_normalize_withPart2bCode_shouldReturnPart2t() {
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
}

/// Whitespace and case are tolerated
#[test]
fn test_normalize_withMessyInput_shouldStillNormalize() {
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");
}

/// Invalid codes are rejected
#[test]
fn test_normalize_withInvalidCode_shouldFail() {
    assert!(normalize_to_part2t("zz").is_err());
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("english").is_err());
}

/// Codes for the same language match across formats
#[test]
fn test_languageCodesMatch_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("de", "deu"));
}

/// Codes for different languages do not match
#[test]
fn test_languageCodesMatch_withDifferentLanguages_shouldReturnFalse() {
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "zz"));
}

/// English names resolve for prompt construction
#[test]
fn test_getLanguageName_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert!(get_language_name("zz").is_err());
}
