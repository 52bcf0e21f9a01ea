/*!
 * Tests for error types
 */

use assai::errors::{AppError, ProviderError, SubtitleError, TranslationError};

#[test]
fn test_provider_error_from_status_withAuthAndRateCodes_shouldClassify() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_subtitle_error_display_shouldIncludeLineNumber() {
    let error = SubtitleError::MalformedDialogue { line: 12, expected: 10, found: 4 };
    assert_eq!(error.to_string(), "Line 12: expected 10 fields, found 4");

    let error = SubtitleError::MissingSchema { line: 3 };
    assert!(error.to_string().starts_with("Line 3:"));
}

#[test]
fn test_app_error_from_translation_error_shouldWrap() {
    let error: AppError = TranslationError::from(ProviderError::ConnectionError("refused".to_string())).into();

    assert!(matches!(error, AppError::Translation(TranslationError::Provider(_))));
    assert_eq!(error.to_string(), "Translation error: Provider error: Connection error: refused");
}

#[test]
fn test_missing_credential_display_shouldNameProvider() {
    let error = AppError::MissingCredential("Anthropic".to_string());
    assert_eq!(error.to_string(), "Missing API key for provider Anthropic");
}
