//! Scripted conversation data

use chrono::NaiveDate;
use serde_json::{json, Value};
use VoiceBuddy::handlers::ToolCall;
use VoiceBuddy::models::HistoryEntry;
use VoiceBuddy::SessionEvent;

pub fn update_order(field: &str, value: Value) -> SessionEvent {
    SessionEvent::ToolCall(ToolCall::new("update_order_field", json!({"field": field, "value": value})))
}

pub fn update_checkin(field: &str, value: Value) -> SessionEvent {
    SessionEvent::ToolCall(ToolCall::new("update_checkin_field", json!({"field": field, "value": value})))
}

pub fn save_order() -> SessionEvent {
    SessionEvent::ToolCall(ToolCall::new("save_order", json!({})))
}

pub fn save_checkin(mood: &str, energy: &str, objectives: &[&str], summary: &str) -> SessionEvent {
    SessionEvent::ToolCall(ToolCall::new(
        "save_checkin",
        json!({"mood": mood, "energy": energy, "objectives": objectives, "summary": summary}),
    ))
}

pub fn agent_spoke() -> SessionEvent {
    SessionEvent::AgentSpeechCommitted { text: "Got it.".to_string() }
}

/// A check-in stored on the given November 2025 day at 9am
pub fn history_entry(day: u32, mood: &str, energy: &str, objectives: &[&str]) -> HistoryEntry {
    let timestamp = NaiveDate::from_ymd_opt(2025, 11, day)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid test date");
    HistoryEntry::at(
        timestamp,
        mood.to_string(),
        Some(energy.to_string()),
        objectives.iter().map(|o| o.to_string()).collect(),
        None,
    )
}

/// The order from the barista walkthrough
pub fn expected_latte_order() -> Value {
    json!({
        "drinkType": "latte",
        "size": "grande",
        "milk": "oat",
        "extras": ["extra shot"],
        "name": "Sam"
    })
}
