//! Storage module
//!
//! File-backed persistence for finished conversations: one JSON file per
//! coffee order and a single wellness log for check-ins.

pub mod orders;
pub mod wellness;

pub use orders::OrderStore;
pub use wellness::{format_history_context, WellnessLog};
