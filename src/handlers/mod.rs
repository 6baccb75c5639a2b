//! Tool handlers module
//!
//! This module contains the tools the LLM calls during a session. Tool
//! results are plain strings that go back to the LLM.

pub mod tools;

// Re-export commonly used handler functions
pub use tools::{handle_tool_call, tool_specs, Tool, ToolCall, ToolSpec};
