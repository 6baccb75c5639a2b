//! Data models module
//!
//! This module contains the records collected by the scripted conversations

pub mod scenario;
pub mod order;
pub mod checkin;

// Re-export commonly used models
pub use scenario::{Scenario, FieldValue};
pub use order::OrderState;
pub use checkin::{CheckInState, HistoryEntry};

use serde::{de::DeserializeOwned, Serialize};

/// A record made of named slots that the dialogue fills one at a time
pub trait SlotRecord: Serialize + DeserializeOwned + Default + Clone {
    /// Scenario this record belongs to
    const SCENARIO: Scenario;

    /// Set one field; returns `false` when the field is not recognized or
    /// the value is `null`, leaving the record unchanged.
    fn set_field(&mut self, field: &str, value: &FieldValue) -> bool;

    /// Whether the named field currently holds a value
    fn is_filled(&self, field: &str) -> bool;
}
