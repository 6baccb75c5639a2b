//! State management module
//!
//! This module handles the in-memory conversation state of a session

pub mod context;
pub mod scenarios;

// Re-export commonly used state components
pub use context::{ConversationState, Record};
pub use scenarios::{SlotFilling, SlotPhase, SlotProgress};
