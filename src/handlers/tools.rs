//! Tool dispatch
//!
//! Barista sessions offer `update_order_field` and `save_order`; wellness
//! sessions offer `update_checkin_field` and `save_checkin`. Every call
//! returns a string for the LLM, errors included, so a bad call never ends
//! the session.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use crate::agents::AgentKind;
use crate::models::scenario::{value_as_list, value_as_text};
use crate::models::{FieldValue, HistoryEntry, Scenario};
use crate::utils::errors::{Result, VoiceBuddyError};
use crate::utils::logging::{log_state_update, log_tool_call};
use crate::worker::AgentSession;

pub const UPDATE_ORDER_FIELD: &str = "update_order_field";
pub const SAVE_ORDER: &str = "save_order";
pub const UPDATE_CHECKIN_FIELD: &str = "update_checkin_field";
pub const SAVE_CHECKIN: &str = "save_checkin";

/// Tool description handed to the LLM
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

/// A tool invocation requested by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct UpdateFieldArgs {
    field: String,
    #[serde(default)]
    value: FieldValue,
}

/// Arguments of `save_checkin`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveCheckInArgs {
    pub mood: String,
    #[serde(default)]
    pub energy: String,
    #[serde(default)]
    pub objectives: FieldValue,
    #[serde(default)]
    pub summary: String,
}

/// A parsed tool call
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    /// Set one field of the session's record
    UpdateField { field: String, value: FieldValue },
    /// Persist the order; any fields passed along are applied first
    SaveOrder(Map<String, Value>),
    /// Persist the check-in given in full
    SaveCheckIn(SaveCheckInArgs),
}

fn decode<T: serde::de::DeserializeOwned>(call: &ToolCall) -> Result<T> {
    let arguments = match &call.arguments {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(arguments)
        .map_err(|e| VoiceBuddyError::InvalidToolArguments(format!("{}: {}", call.name, e)))
}

impl Tool {
    /// Parse a call against the tools `kind` offers
    pub fn parse(kind: AgentKind, call: &ToolCall) -> Result<Self> {
        match (kind, call.name.as_str()) {
            (AgentKind::Barista, UPDATE_ORDER_FIELD) | (AgentKind::Wellness, UPDATE_CHECKIN_FIELD) => {
                let args: UpdateFieldArgs = decode(call)?;
                Ok(Tool::UpdateField {
                    field: args.field,
                    value: args.value,
                })
            }
            (AgentKind::Barista, SAVE_ORDER) => Ok(Tool::SaveOrder(decode(call)?)),
            (AgentKind::Wellness, SAVE_CHECKIN) => Ok(Tool::SaveCheckIn(decode(call)?)),
            _ => Err(VoiceBuddyError::UnknownTool(call.name.clone())),
        }
    }
}

/// Tools offered by an agent
pub fn tool_specs(kind: AgentKind) -> Vec<ToolSpec> {
    let scenario = kind.scenario();
    let update_parameters = json!({
        "type": "object",
        "properties": {
            "field": {"type": "string", "enum": scenario.fields()},
            "value": {"description": "New value; a list of strings for list fields"}
        },
        "required": ["field", "value"]
    });

    match kind {
        AgentKind::Barista => vec![
            ToolSpec {
                name: UPDATE_ORDER_FIELD,
                description: "Update a single field of the current coffee order.",
                parameters: update_parameters,
            },
            ToolSpec {
                name: SAVE_ORDER,
                description: "Save the confirmed order. Call only after the customer confirms it.",
                parameters: json!({"type": "object", "properties": {}}),
            },
        ],
        AgentKind::Wellness => vec![
            ToolSpec {
                name: UPDATE_CHECKIN_FIELD,
                description: "Update a single field in the current check-in session.",
                parameters: update_parameters,
            },
            ToolSpec {
                name: SAVE_CHECKIN,
                description: "Save the daily wellness check-in once the user confirms the recap.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "mood": {"type": "string", "description": "Self-reported mood, e.g. good, stressed, tired"},
                        "energy": {"type": "string", "description": "Energy level: high, medium or low"},
                        "objectives": {"type": "array", "items": {"type": "string"}, "description": "One to three goals for the day"},
                        "summary": {"type": "string", "description": "Brief summary of the conversation"}
                    },
                    "required": ["mood", "energy", "objectives", "summary"]
                }),
            },
        ],
    }
}

/// Run one tool call against a session and return the result for the LLM
pub async fn handle_tool_call(session: &mut AgentSession, call: &ToolCall) -> String {
    debug!(session_id = %session.session_id(), tool = %call.name, arguments = %call.arguments, "Tool call received");

    let result = match Tool::parse(session.kind(), call) {
        Ok(Tool::UpdateField { field, value }) => update_field(session, &field, &value).await,
        Ok(Tool::SaveOrder(fields)) => save_order(session, &fields).await,
        Ok(Tool::SaveCheckIn(args)) => save_checkin(session, args).await,
        Err(e) => {
            warn!(session_id = %session.session_id(), tool = %call.name, error = %e, "Rejected tool call");
            format!("Error: {}", e)
        }
    };

    log_tool_call(session.session_id(), &call.name, &result);
    result
}

async fn update_field(session: &mut AgentSession, field: &str, value: &FieldValue) -> String {
    let scenario = session.kind().scenario();
    if !scenario.is_recognized(field) {
        return format!(
            "Unknown field '{}'. Valid fields: {}.",
            field,
            scenario.fields().join(", ")
        );
    }

    let applied = session.state_mut().set_field(field, value);
    let session_id = session.session_id().to_string();
    log_state_update(&session_id, field, applied);

    if !applied {
        return format!("No value given for {}; nothing was changed.", field);
    }

    session.broadcast_state().await;
    let shown = value_as_text(value).unwrap_or_default();
    format!("Updated {} to {}. {}", field, shown, session.progress().describe())
}

async fn save_order(session: &mut AgentSession, fields: &Map<String, Value>) -> String {
    for (field, value) in fields {
        if !session.state_mut().set_field(field, value) {
            debug!(session_id = %session.session_id(), field = %field, "Ignoring save_order argument");
        }
    }

    let missing = session.slots().missing_fields(session.state());
    if !missing.is_empty() {
        warn!(session_id = %session.session_id(), missing = ?missing, "Saving order with missing fields");
    }

    let Some(order) = session.state().order().cloned() else {
        return "Error saving order: this session is not taking an order".to_string();
    };

    let saved = session.services().orders.save(&order).await;
    match saved {
        Ok(path) => {
            session.mark_finalized();
            session.broadcast_state().await;
            info!(session_id = %session.session_id(), path = %path.display(), "Order saved");
            format!("Order saved successfully to {}.", path.display())
        }
        Err(e) => {
            error!(session_id = %session.session_id(), error = %e, "Error saving order");
            format!("Error saving order: {}", e)
        }
    }
}

async fn save_checkin(session: &mut AgentSession, args: SaveCheckInArgs) -> String {
    let objectives = value_as_list(&args.objectives).unwrap_or_default();
    let energy = Some(args.energy.trim().to_string()).filter(|e| !e.is_empty());
    let summary = Some(args.summary.trim().to_string()).filter(|s| !s.is_empty());

    let count = objectives.len();
    let entry = HistoryEntry::new(args.mood.clone(), energy, objectives, summary);

    let appended = session.services().wellness.append(&entry).await;
    match appended {
        Ok(total) => {
            let state = session.state_mut();
            state.set_field("mood", &Value::from(entry.mood.clone()));
            if let Some(energy) = &entry.energy {
                state.set_field("energy", &Value::from(energy.clone()));
            }
            state.set_field("objectives", &Value::from(entry.objectives.clone()));
            if let Some(summary) = &entry.summary {
                state.set_field("summary", &Value::from(summary.clone()));
            }
            session.mark_finalized();
            info!(session_id = %session.session_id(), mood = %entry.mood, total = total, "Saved check-in");
            match serde_json::to_value(&entry) {
                Ok(payload) => session.publisher().publish(Scenario::CheckIn, payload).await,
                Err(e) => warn!(error = %e, "Failed to serialize saved check-in"),
            }
            format!(
                "Check-in saved successfully! Recorded mood: {}, energy: {}, with {} objectives.",
                args.mood, args.energy, count
            )
        }
        Err(e) => {
            error!(session_id = %session.session_id(), error = %e, "Error saving check-in");
            format!("Error saving check-in: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_update_call() {
        let call = ToolCall::new(UPDATE_ORDER_FIELD, json!({"field": "size", "value": "tall"}));
        assert_eq!(
            Tool::parse(AgentKind::Barista, &call).unwrap(),
            Tool::UpdateField { field: "size".to_string(), value: json!("tall") }
        );
    }

    #[test]
    fn test_tools_are_scoped_to_their_agent() {
        let call = ToolCall::new(SAVE_ORDER, Value::Null);
        assert_matches!(Tool::parse(AgentKind::Wellness, &call), Err(VoiceBuddyError::UnknownTool(name)) if name == "save_order");
        assert_matches!(Tool::parse(AgentKind::Barista, &call), Ok(Tool::SaveOrder(fields)) if fields.is_empty());
    }

    #[test]
    fn test_malformed_arguments() {
        let call = ToolCall::new(UPDATE_CHECKIN_FIELD, json!({"value": "tired"}));
        assert_matches!(
            Tool::parse(AgentKind::Wellness, &call),
            Err(VoiceBuddyError::InvalidToolArguments(_))
        );

        let call = ToolCall::new(SAVE_CHECKIN, json!({"energy": "low"}));
        assert_matches!(
            Tool::parse(AgentKind::Wellness, &call),
            Err(VoiceBuddyError::InvalidToolArguments(_))
        );
    }

    #[test]
    fn test_save_checkin_accepts_string_objectives() {
        let call = ToolCall::new(
            SAVE_CHECKIN,
            json!({"mood": "okay", "energy": "medium", "objectives": "email, gym", "summary": "fine"}),
        );
        let Ok(Tool::SaveCheckIn(args)) = Tool::parse(AgentKind::Wellness, &call) else {
            panic!("expected save_checkin");
        };
        assert_eq!(value_as_list(&args.objectives).unwrap(), vec!["email", "gym"]);
    }

    #[test]
    fn test_update_spec_lists_scenario_fields() {
        let specs = tool_specs(AgentKind::Barista);
        assert_eq!(specs[0].name, UPDATE_ORDER_FIELD);
        assert_eq!(
            specs[0].parameters["properties"]["field"]["enum"],
            json!(["drinkType", "size", "milk", "extras", "name"])
        );
    }
}
