//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the VoiceBuddy agents.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{VoiceBuddyError, Result};

/// Initialize logging based on configuration
///
/// Console output always goes to stderr so stdout stays free for the
/// console data channel. The returned guard must be held for the lifetime
/// of the process, otherwise buffered file output is lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| VoiceBuddyError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let console_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "voicebuddy.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| VoiceBuddyError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a tool invocation coming from the LLM
pub fn log_tool_call(session_id: &str, tool: &str, result: &str) {
    info!(
        session_id = session_id,
        tool = tool,
        result = result,
        "Tool invoked"
    );
}

/// Log a field update in the conversation state
pub fn log_state_update(session_id: &str, field: &str, applied: bool) {
    if applied {
        debug!(session_id = session_id, field = field, "Conversation field updated");
    } else {
        warn!(session_id = session_id, field = field, "Conversation field update ignored");
    }
}

/// Log a persisted record
pub fn log_record_saved(kind: &str, location: &str) {
    info!(kind = kind, location = location, "Record persisted");
}

/// Log errors raised at the worker boundary with context
pub fn log_session_error(room: &str, error: &str, context: Option<&str>) {
    error!(
        room = room,
        error = error,
        context = context,
        "Unhandled error in agent session"
    );
}
