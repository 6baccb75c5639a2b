//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{VoiceBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_livekit_config(&settings.livekit)?;
    validate_storage_config(&settings.storage)?;
    validate_broadcast_config(&settings.broadcast)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate LiveKit configuration
///
/// Credentials are optional here; they are only required when a token is minted.
fn validate_livekit_config(config: &super::LiveKitConfig) -> Result<()> {
    if let Some(ref raw) = config.url {
        let parsed = url::Url::parse(raw)?;
        if !matches!(parsed.scheme(), "ws" | "wss" | "http" | "https") {
            return Err(VoiceBuddyError::Config(
                format!("LiveKit URL must use ws, wss, http or https: {}", raw)
            ));
        }
    }

    if config.token_ttl_seconds == 0 {
        return Err(VoiceBuddyError::Config(
            "Token TTL must be greater than 0".to_string()
        ));
    }

    if config.default_agent_name.is_empty() {
        return Err(VoiceBuddyError::Config(
            "Default agent name is required".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.orders_dir.as_os_str().is_empty() {
        return Err(VoiceBuddyError::Config(
            "Orders directory is required".to_string()
        ));
    }

    if config.wellness_log_path.as_os_str().is_empty() {
        return Err(VoiceBuddyError::Config(
            "Wellness log path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate broadcast configuration
fn validate_broadcast_config(config: &super::BroadcastConfig) -> Result<()> {
    if config.queue_capacity == 0 {
        return Err(VoiceBuddyError::Config(
            "Broadcast queue capacity must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(VoiceBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(VoiceBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(VoiceBuddyError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_queue_capacity() {
        let mut settings = Settings::default();
        settings.broadcast.queue_capacity = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_livekit_url_must_parse() {
        let mut settings = Settings::default();
        settings.livekit.url = Some("not a url".to_string());
        assert_matches!(validate_settings(&settings), Err(VoiceBuddyError::UrlParse(_)));

        settings.livekit.url = Some("ftp://example.com".to_string());
        assert_matches!(validate_settings(&settings), Err(VoiceBuddyError::Config(_)));

        settings.livekit.url = Some("wss://demo.livekit.cloud".to_string());
        assert!(validate_settings(&settings).is_ok());
    }
}
