/*!
 * Tests for language utility functions
 */

use submerge::language_utils::{normalize_to_part2t, language_codes_match, get_language_name};

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("eng").unwrap(), "eng");

    // ISO 639-2/B codes convert to their 639-2/T counterparts
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");

    // Whitespace and case are tolerated
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");

    assert!(normalize_to_part2t("xyzzy").is_err());
    assert!(normalize_to_part2t("q").is_err());
}

/// Test language code matching across spellings
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("eng", "en"));
    assert!(language_codes_match("fre", "fra"));
    assert!(language_codes_match("FR", "fra"));

    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "not-a-code"));
}

/// Test language display names
#[test]
fn test_get_language_name_withValidCode_shouldReturnName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fra").unwrap(), "French");
    assert!(get_language_name("xyzzy").is_err());
}
