/*!
 * Tests for language utility functions
 */

use assai::language_utils::{
    display_name, get_language_name, language_codes_match, normalize_to_part1_or_part2t,
    normalize_to_part2t, validate_language_code, LanguageCodeType,
};

#[test]
fn test_validate_language_code_withValidCodes_shouldReturnType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("fra").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B);
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_normalize_to_part2t_withAllForms_shouldReturnTerminologyCode() {
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t(" DE ").unwrap(), "deu");
}

#[test]
fn test_normalize_to_part1_or_part2t_withThreeLetterCode_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part2t("spa").unwrap(), "es");
}

#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fre", "fr"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("draft", "fr"));
}

#[test]
fn test_get_language_name_withCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_display_name_withUnknownCode_shouldFallBackToCode() {
    assert_eq!(display_name("ja"), "Japanese");
    assert_eq!(display_name(" Klingon "), "Klingon");
}
