//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::utils::errors::{VoiceBuddyError, Result};

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub livekit: LiveKitConfig,
    pub providers: ProvidersConfig,
    pub storage: StorageConfig,
    pub broadcast: BroadcastConfig,
    pub logging: LoggingConfig,
}

/// LiveKit server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LiveKitConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub token_ttl_seconds: u64,
    pub default_agent_name: String,
}

/// API keys consumed by the external speech and language plugins
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub deepgram_api_key: Option<String>,
    pub google_api_key: Option<String>,
}

/// Where orders and check-ins are written
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub orders_dir: PathBuf,
    pub wellness_log_path: PathBuf,
    pub history_format: HistoryFormat,
}

/// On-disk layout of the wellness history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryFormat {
    /// Single JSON array, rewritten on every append
    #[default]
    JsonArray,
    /// One JSON record per line, append-only
    JsonLines,
}

/// Frontend broadcast configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BroadcastConfig {
    pub queue_capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self> {
        Self::load(Path::new("config"))
    }

    /// Load settings using an explicit configuration file stem
    ///
    /// Sources, lowest priority first: built-in defaults, the optional file,
    /// `VOICEBUDDY__SECTION__KEY` variables, then the plain variables the
    /// LiveKit and plugin tooling share (`LIVEKIT_URL`, `DEEPGRAM_API_KEY`, ...).
    pub fn load(file: &Path) -> Result<Self> {
        let file_name = file.to_string_lossy();
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix("VOICEBUDDY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("livekit.url", env_var("LIVEKIT_URL"))?
            .set_override_option("livekit.api_key", env_var("LIVEKIT_API_KEY"))?
            .set_override_option("livekit.api_secret", env_var("LIVEKIT_API_SECRET"))?
            .set_override_option("providers.deepgram_api_key", env_var("DEEPGRAM_API_KEY"))?
            .set_override_option("providers.google_api_key", env_var("GOOGLE_API_KEY"))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_settings(self)
    }

    /// The Deepgram key is the one credential checked locally
    pub fn deepgram_api_key(&self) -> Result<&str> {
        self.providers
            .deepgram_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| VoiceBuddyError::MissingApiKey { name: "DEEPGRAM_API_KEY".to_string() })
    }
}

impl LiveKitConfig {
    /// Server URL, API key and secret, or the first one that is missing
    pub fn credentials(&self) -> Result<(&str, &str, &str)> {
        let url = required(&self.url, "LIVEKIT_URL")?;
        let api_key = required(&self.api_key, "LIVEKIT_API_KEY")?;
        let api_secret = required(&self.api_secret, "LIVEKIT_API_SECRET")?;
        Ok((url, api_key, api_secret))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| VoiceBuddyError::Config(format!("{} is not defined", name)))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl std::fmt::Debug for ProvidersConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidersConfig")
            .field("deepgram_api_key", &self.deepgram_api_key.as_ref().map(|_| "<redacted>"))
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            api_secret: None,
            token_ttl_seconds: 15 * 60,
            default_agent_name: "myagent".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            orders_dir: PathBuf::from("orders"),
            wellness_log_path: PathBuf::from("wellness_log.json"),
            history_format: HistoryFormat::JsonArray,
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.storage.orders_dir, PathBuf::from("orders"));
        assert_eq!(settings.storage.wellness_log_path, PathBuf::from("wellness_log.json"));
        assert_eq!(settings.storage.history_format, HistoryFormat::JsonArray);
        assert_eq!(settings.livekit.token_ttl_seconds, 900);
        assert_eq!(settings.livekit.default_agent_name, "myagent");
    }

    #[test]
    fn test_missing_deepgram_key() {
        let settings = Settings::default();
        assert_matches!(
            settings.deepgram_api_key(),
            Err(VoiceBuddyError::MissingApiKey { name }) if name == "DEEPGRAM_API_KEY"
        );
    }

    #[test]
    fn test_blank_deepgram_key_is_missing() {
        let mut settings = Settings::default();
        settings.providers.deepgram_api_key = Some("   ".to_string());
        assert!(settings.deepgram_api_key().is_err());

        settings.providers.deepgram_api_key = Some("dg-key".to_string());
        assert_eq!(settings.deepgram_api_key().unwrap(), "dg-key");
    }

    #[test]
    fn test_credentials_report_first_missing_variable() {
        let mut livekit = LiveKitConfig::default();
        livekit.url = Some("wss://example.livekit.cloud".to_string());

        let err = livekit.credentials().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: LIVEKIT_API_KEY is not defined");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let providers = ProvidersConfig {
            deepgram_api_key: Some("secret-value".to_string()),
            google_api_key: None,
        };
        let rendered = format!("{:?}", providers);
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
