//! Slot-filling progress
//!
//! The order in which fields are asked for is decided by the hosted LLM
//! following its instructions. This module only reports progress: which
//! required fields are still missing, which one the script asks for next,
//! and whether the record is ready to be confirmed. It never blocks an update.

use serde::Serialize;
use super::context::ConversationState;
use crate::models::Scenario;

/// Where a conversation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPhase {
    /// Required fields are still missing
    Collecting,
    /// All required fields are set, waiting for the user to confirm
    AwaitingConfirmation,
    /// The record has been persisted
    Finalized,
}

/// Progress report for a conversation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotProgress {
    pub scenario: Scenario,
    pub phase: SlotPhase,
    pub missing: Vec<&'static str>,
    pub next_field: Option<&'static str>,
}

/// Stateless slot-filling rules for both scenarios
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotFilling;

impl SlotFilling {
    pub fn new() -> Self {
        Self
    }

    /// Required fields not yet set, in the order the script asks for them
    pub fn missing_fields(&self, state: &ConversationState) -> Vec<&'static str> {
        state
            .scenario()
            .required_fields()
            .iter()
            .copied()
            .filter(|field| !state.is_filled(field))
            .collect()
    }

    /// The next field the dialogue should ask for
    pub fn next_field(&self, state: &ConversationState) -> Option<&'static str> {
        self.missing_fields(state).into_iter().next()
    }

    pub fn is_complete(&self, state: &ConversationState) -> bool {
        self.missing_fields(state).is_empty()
    }

    /// Full progress report; `finalized` is tracked by the session
    pub fn progress(&self, state: &ConversationState, finalized: bool) -> SlotProgress {
        let missing = self.missing_fields(state);
        let phase = if finalized {
            SlotPhase::Finalized
        } else if missing.is_empty() {
            SlotPhase::AwaitingConfirmation
        } else {
            SlotPhase::Collecting
        };

        SlotProgress {
            scenario: state.scenario(),
            phase,
            next_field: missing.first().copied(),
            missing,
        }
    }
}

impl SlotProgress {
    /// One-line summary appended to tool results for the LLM
    pub fn describe(&self) -> String {
        match self.phase {
            SlotPhase::Collecting => format!("Still needed: {}.", self.missing.join(", ")),
            SlotPhase::AwaitingConfirmation => {
                "All required details collected; confirm with the user before saving.".to_string()
            }
            SlotPhase::Finalized => "Already saved.".to_string(),
        }
    }
}
