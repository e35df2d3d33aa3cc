/*!
 * Tests for configuration loading, validation and persistence
 */

use locadapt::app_config::{Config, LogLevel};

#[test]
fn test_config_default_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.provider.model, "adaptive-md-1");
    assert_eq!(config.provider.retry_count, 3);
    assert!(config.translation.use_tm_leverage);
    assert_eq!(config.translation.tm_method_threshold, 75);
    assert_eq!(config.translation.inter_call_delay_ms, 500);
    assert_eq!(config.autosave.debounce_ms, 3000);
    assert_eq!(config.autosave.max_attempts, 3);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_validate_withBadLanguageCode_shouldFail() {
    let config = Config {
        target_language: "not-a-language".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    config.provider.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    config.provider.endpoint = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeThresholds_shouldFail() {
    let mut config = Config::default();
    config.translation.tm_method_threshold = 101;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.fuzzy_threshold = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.autosave.max_attempts = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_fromFile_roundTrip_shouldPreserveSettings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.provider.api_key = Some("test-key".to_string());
    config.translation.tm_method_threshold = 80;
    config.autosave.debounce_ms = 1500;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.provider.api_key.as_deref(), Some("test-key"));
    assert_eq!(loaded.translation.tm_method_threshold, 80);
    assert_eq!(loaded.autosave.debounce_ms, 1500);
}

#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"source_language": "en", "target_language": "es"}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.target_language, "es");
    assert_eq!(config.provider.retry_count, 3);
    assert_eq!(config.autosave.debounce_ms, 3000);
    assert!(config.translation.use_tm_leverage);
}

#[test]
fn test_fromFile_withInvalidSettings_shouldFail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"source_language": "en", "target_language": "zz-invalid"}"#,
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_fromFile_missingFile_shouldFail() {
    assert!(Config::from_file("/nonexistent/config.json").is_err());
}
