/*!
 * Tests for app configuration functionality
 */

use anyhow::Result;
use subsweep::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();

    assert!(!config.translation.enabled);
    assert!(config.translation.target_language.is_empty());
    assert!(!config.translation.endpoint.is_empty());
    assert!(!config.spam_patterns.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);

    assert!(config.validate().is_ok());
}

/// Test that enabling translation requires a target language
#[test]
fn test_validate_withTranslationEnabledAndNoLanguage_shouldFail() {
    let mut config = Config::default();
    config.translation.enabled = true;

    assert!(config.validate().is_err());

    config.translation.target_language = "   ".to_string();
    assert!(config.validate().is_err());

    config.translation.target_language = "es".to_string();
    assert!(config.validate().is_ok());
}

/// Test that target language content beyond non-empty is not second-guessed
#[test]
fn test_validate_withUnknownLanguageCode_shouldStillPass() {
    let mut config = Config::default();
    config.translation.enabled = true;
    config.translation.target_language = "not-a-language".to_string();

    // An invalid code is the translation endpoint's failure to report
    assert!(config.validate().is_ok());
}

/// Test that a broken spam pattern fails validation
#[test]
fn test_validate_withInvalidSpamPattern_shouldFail() {
    let mut config = Config::default();
    config.spam_patterns.push("(unclosed".to_string());

    assert!(config.validate().is_err());
}

/// Test that an empty endpoint fails validation
#[test]
fn test_validate_withEmptyEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.endpoint = String::new();

    assert!(config.validate().is_err());
}

/// Test config file creation and reload round trip
#[test]
fn test_load_or_create_withMissingFile_shouldCreateDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&config_path)?;
    assert!(config_path.exists());

    let reloaded = Config::load_or_create(&config_path)?;
    assert_eq!(created.spam_patterns, reloaded.spam_patterns);
    assert_eq!(created.translation.endpoint, reloaded.translation.endpoint);

    Ok(())
}

/// Test loading a sparse config file fills in defaults
#[test]
fn test_load_or_create_withSparseFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{"translation": {"enabled": true, "target_language": "es"}}"#,
    )?;

    let config = Config::load_or_create(&config_path)?;

    assert!(config.translation.enabled);
    assert_eq!(config.translation.target_language, "es");
    assert!(!config.translation.endpoint.is_empty());
    assert!(!config.spam_patterns.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

/// Test that a malformed config file is an error, not a silent default
#[test]
fn test_load_or_create_withBrokenFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        "this is not json",
    )?;

    assert!(Config::load_or_create(&config_path).is_err());

    Ok(())
}

/// Test log level serde representation
#[test]
fn test_log_level_serde_shouldUseLowercase() -> Result<()> {
    let level: LogLevel = serde_json::from_str("\"debug\"")?;
    assert_eq!(level, LogLevel::Debug);

    let serialized = serde_json::to_string(&LogLevel::Warn)?;
    assert_eq!(serialized, "\"warn\"");

    Ok(())
}
