use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils::validate_language_code;

/// Engine configuration module
/// This module handles the engine configuration including loading,
/// validating and saving configuration settings.
/// Represents the engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Generative provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Translation/leverage settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Autosave settings
    #[serde(default)]
    pub autosave: AutosaveConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the remote generative translation service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier passed through to the service
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings governing the TM leverage engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Whether translation-memory leverage is enabled by default
    #[serde(default = "default_true")]
    pub use_tm_leverage: bool,

    /// Fixed delay in milliseconds between consecutive segment translations
    /// in a batch run. The generative service is rate-limited; sequential
    /// pacing avoids burst throttling.
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,

    /// Minimum leverage percentage for a result to be recorded with
    /// translation method `tm` rather than `ai`
    #[serde(default = "default_tm_method_threshold")]
    pub tm_method_threshold: u8,

    /// Similarity threshold (0.0-1.0) for classifying a TM candidate as fuzzy
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            use_tm_leverage: true,
            inter_call_delay_ms: default_inter_call_delay_ms(),
            tm_method_threshold: default_tm_method_threshold(),
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

/// Settings governing the autosave controller
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AutosaveConfig {
    /// Debounce window in milliseconds; a save fires only after the segment
    /// collection has been quiescent for this long
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Total save attempts before surfacing a persistence failure
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Log level for the engine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_endpoint() -> String {
    // Trailing slash so endpoint paths join as child routes
    "http://localhost:8080/v1/adapt/".to_string()
}

fn default_model() -> String {
    "adaptive-md-1".to_string()
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_inter_call_delay_ms() -> u64 {
    500
}

fn default_tm_method_threshold() -> u8 {
    75
}

fn default_fuzzy_threshold() -> f32 {
    0.7
}

fn default_debounce_ms() -> u64 {
    3000
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            provider: ProviderConfig::default(),
            translation: TranslationConfig::default(),
            autosave: AutosaveConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_language_code(&self.source_language)?;
        validate_language_code(&self.target_language)?;

        if self.provider.endpoint.trim().is_empty() {
            return Err(anyhow!("Provider endpoint must not be empty"));
        }
        url::Url::parse(&self.provider.endpoint)
            .map_err(|e| anyhow!("Invalid provider endpoint: {}", e))?;

        if self.translation.tm_method_threshold > 100 {
            return Err(anyhow!(
                "tm_method_threshold must be 0-100, got {}",
                self.translation.tm_method_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.translation.fuzzy_threshold) {
            return Err(anyhow!(
                "fuzzy_threshold must be between 0.0 and 1.0, got {}",
                self.translation.fuzzy_threshold
            ));
        }
        if self.autosave.max_attempts == 0 {
            return Err(anyhow!("autosave max_attempts must be at least 1"));
        }

        Ok(())
    }
}
