//! Error handling for VoiceBuddy
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for VoiceBuddy application
#[derive(Error, Debug)]
pub enum VoiceBuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("{name} is not set. Add {name}=<your_key> to .env.local")]
    MissingApiKey { name: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidToolArguments(String),

    #[error("Data channel error: {0}")]
    Channel(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("LiveKit access token error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for VoiceBuddy operations
pub type Result<T> = std::result::Result<T, VoiceBuddyError>;

impl VoiceBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            VoiceBuddyError::Config(_) => false,
            VoiceBuddyError::ConfigLoad(_) => false,
            VoiceBuddyError::MissingApiKey { .. } => false,
            VoiceBuddyError::UnknownTool(_) => true,
            VoiceBuddyError::InvalidToolArguments(_) => true,
            VoiceBuddyError::Channel(_) => true,
            VoiceBuddyError::Session(_) => false,
            VoiceBuddyError::LiveKit(_) => false,
            VoiceBuddyError::Serialization(_) => false,
            VoiceBuddyError::Io(_) => true,
            VoiceBuddyError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VoiceBuddyError::Config(_) => ErrorSeverity::Critical,
            VoiceBuddyError::ConfigLoad(_) => ErrorSeverity::Critical,
            VoiceBuddyError::MissingApiKey { .. } => ErrorSeverity::Critical,
            VoiceBuddyError::UnknownTool(_) => ErrorSeverity::Warning,
            VoiceBuddyError::InvalidToolArguments(_) => ErrorSeverity::Info,
            VoiceBuddyError::Channel(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
