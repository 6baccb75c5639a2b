//! Conversation state management
//!
//! This module holds the record a session is filling in. The state lives in
//! memory for the duration of one session and is discarded with it; saving
//! a finished record is the job of the storage module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::{CheckInState, FieldValue, OrderState, Scenario, SlotRecord};
use crate::utils::errors::Result;
use crate::utils::helpers::generate_uuid;

/// The record behind a conversation, one variant per scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", content = "record", rename_all = "snake_case")]
pub enum Record {
    Order(OrderState),
    CheckIn(CheckInState),
}

impl Record {
    fn empty(scenario: Scenario) -> Self {
        match scenario {
            Scenario::Order => Record::Order(OrderState::default()),
            Scenario::CheckIn => Record::CheckIn(CheckInState::default()),
        }
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            Record::Order(_) => OrderState::SCENARIO,
            Record::CheckIn(_) => CheckInState::SCENARIO,
        }
    }

    fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match self {
            Record::Order(order) => order.set_field(field, value),
            Record::CheckIn(checkin) => checkin.set_field(field, value),
        }
    }

    fn is_filled(&self, field: &str) -> bool {
        match self {
            Record::Order(order) => order.is_filled(field),
            Record::CheckIn(checkin) => checkin.is_filled(field),
        }
    }

    fn to_value(&self) -> Result<Value> {
        Ok(match self {
            Record::Order(order) => serde_json::to_value(order)?,
            Record::CheckIn(checkin) => serde_json::to_value(checkin)?,
        })
    }
}

/// Per-session conversation state
#[derive(Debug, Clone, Serialize)]
pub struct ConversationState {
    /// Session this state belongs to
    pub session_id: String,
    #[serde(flatten)]
    record: Record,
    /// When a field was last set
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Fresh state with every recognized field at its null/empty default
    pub fn initialize(scenario: Scenario) -> Self {
        Self {
            session_id: generate_uuid(),
            record: Record::empty(scenario),
            updated_at: Utc::now(),
        }
    }

    /// Set one field and return the state
    ///
    /// An unrecognized field (or a `null` value) returns the state unchanged.
    pub fn update(mut self, field: &str, value: FieldValue) -> Self {
        self.set_field(field, &value);
        self
    }

    /// Set one field in place; returns whether anything changed
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        let applied = self.record.set_field(field, value);
        if applied {
            self.updated_at = Utc::now();
        } else {
            debug!(session_id = %self.session_id, scenario = %self.scenario(), field = field,
                   "Ignoring update for unrecognized field or null value");
        }
        applied
    }

    pub fn scenario(&self) -> Scenario {
        self.record.scenario()
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// The order being taken, if this is a barista session
    pub fn order(&self) -> Option<&OrderState> {
        match &self.record {
            Record::Order(order) => Some(order),
            Record::CheckIn(_) => None,
        }
    }

    /// The check-in being filled, if this is a wellness session
    pub fn checkin(&self) -> Option<&CheckInState> {
        match &self.record {
            Record::CheckIn(checkin) => Some(checkin),
            Record::Order(_) => None,
        }
    }

    /// Whether the named field currently holds a value
    pub fn is_filled(&self, field: &str) -> bool {
        self.record.is_filled(field)
    }

    /// Current value of a field as JSON
    pub fn get(&self, field: &str) -> Option<Value> {
        if !self.scenario().is_recognized(field) {
            return None;
        }
        self.payload().ok().and_then(|payload| payload.get(field).cloned())
    }

    /// The record as it appears on the wire and on disk
    pub fn payload(&self) -> Result<Value> {
        self.record.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initialize_order() {
        let state = ConversationState::initialize(Scenario::Order);
        assert_eq!(state.scenario(), Scenario::Order);
        assert_eq!(
            state.payload().unwrap(),
            json!({"drinkType": null, "size": null, "milk": null, "extras": [], "name": null})
        );
        assert!(state.checkin().is_none());
    }

    #[test]
    fn test_initialize_checkin() {
        let state = ConversationState::initialize(Scenario::CheckIn);
        assert_eq!(
            state.payload().unwrap(),
            json!({"mood": null, "energy": null, "objectives": [], "summary": null})
        );
        assert!(state.order().is_none());
    }

    #[test]
    fn test_update_overwrites() {
        let state = ConversationState::initialize(Scenario::Order)
            .update("size", json!("tall"))
            .update("size", json!("grande"));
        assert_eq!(state.get("size"), Some(json!("grande")));
    }

    #[test]
    fn test_update_unknown_field_leaves_state_unchanged() {
        let state = ConversationState::initialize(Scenario::CheckIn).update("mood", json!("okay"));
        let before = state.payload().unwrap();
        let stamp = state.updated_at;

        let state = state.update("drinkType", json!("latte"));
        assert_eq!(state.payload().unwrap(), before);
        assert_eq!(state.updated_at, stamp);
        assert_eq!(state.get("drinkType"), None);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = ConversationState::initialize(Scenario::Order);
        let b = ConversationState::initialize(Scenario::Order);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_state_serializes_with_scenario_tag() {
        let state = ConversationState::initialize(Scenario::CheckIn);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["scenario"], json!("check_in"));
        assert_eq!(value["record"]["objectives"], json!([]));
    }
}
