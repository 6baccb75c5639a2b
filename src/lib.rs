//! VoiceBuddy voice agents
//!
//! Conversation state capture and broadcast for two scripted voice agents: a
//! barista that takes coffee orders and a wellness companion that runs daily
//! check-ins. Speech, language and transport are external services; this
//! library keeps the per-session record, persists it when the user confirms
//! and pushes every change to the frontend over the room's data channel.

#![allow(non_snake_case)]

pub mod config;
pub mod agents;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod storage;
pub mod worker;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{VoiceBuddyError, Result};

// Re-export main components for easy access
pub use agents::AgentKind;
pub use services::ServiceFactory;
pub use state::ConversationState;
pub use worker::{entrypoint, AgentSession, JobContext, JobProcess, SessionEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
