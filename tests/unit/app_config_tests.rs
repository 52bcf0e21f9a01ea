/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;

use assai::app_config::{Config, LogLevel, TranslationProvider, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use assai::errors::AppError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.common.batch_size, 10);
    assert_eq!(config.translation.common.pacing_delay_ms, None);
    assert_eq!(config.log_level, LogLevel::Info);

    let openai_config = config.translation.get_provider_config(&TranslationProvider::OpenAI)
        .expect("OpenAI provider config should exist");
    assert_eq!(openai_config.model, "gpt-3.5-turbo");
    assert_eq!(openai_config.endpoint, "https://api.openai.com/v1");
    assert!(openai_config.api_key.is_empty());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    config.translation.common.batch_size = MIN_BATCH_SIZE - 1;
    assert!(config.validate().is_err());
    config.translation.common.batch_size = MAX_BATCH_SIZE + 1;
    assert!(config.validate().is_err());
    config.translation.common.batch_size = MAX_BATCH_SIZE;
    assert!(config.validate().is_ok());

    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test that translation requires an API key for remote providers
#[test]
fn test_validate_for_translation_withoutApiKey_shouldReportMissingCredential() {
    let config = Config::default();

    let error = config.validate_for_translation().unwrap_err();
    match error.downcast_ref::<AppError>() {
        Some(AppError::MissingCredential(provider)) => assert_eq!(provider, "OpenAI"),
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(common::test_config().validate_for_translation().is_ok());
}

/// Test that the local provider needs no API key
#[test]
fn test_require_credentials_withLmStudio_shouldSucceedWithoutKey() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;

    assert!(config.translation.require_credentials().is_ok());
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
}

/// Test provider name parsing
#[test]
fn test_translation_provider_from_str_withNames_shouldParse() {
    assert_eq!("OpenAI".parse::<TranslationProvider>().unwrap(), TranslationProvider::OpenAI);
    assert_eq!("lmstudio".parse::<TranslationProvider>().unwrap(), TranslationProvider::LMStudio);
    assert!("ollama".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Anthropic.to_string(), "anthropic");
}

/// Test that missing fields fall back to their defaults
#[test]
fn test_config_from_json_withPartialContent_shouldUseDefaults() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "target_language": "es",
        "translation": {
            "provider": "anthropic",
            "available_providers": [
                { "type": "anthropic", "api_key": "sk-test" }
            ],
            "common": { "batch_size": 5, "pacing_delay_ms": 0 }
        }
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.translation.provider, TranslationProvider::Anthropic);
    assert_eq!(config.translation.get_model(), "claude-3-haiku-20240307");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.translation.get_timeout_secs(), 60);
    assert_eq!(config.translation.common.batch_size, 5);
    assert_eq!(config.translation.common.pacing_delay_ms, Some(0));
    assert!(config.translation.common.system_prompt.contains("{target_language}"));
    assert!(config.validate_for_translation().is_ok());
    Ok(())
}

/// Test the load-or-create round trip
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.target_language, created.target_language);
    assert_eq!(loaded.translation.available_providers.len(), 3);
    Ok(())
}
