//! Scenario model
//!
//! A scenario names which record a session is filling in and how that
//! record is announced to the frontend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::utils::helpers::{normalize_whitespace, split_list};

/// Untyped value supplied by the dialogue for a single field
pub type FieldValue = Value;

/// The two scripted conversations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Coffee order taken by the barista agent
    Order,
    /// Daily wellness check-in
    CheckIn,
}

impl Scenario {
    /// Every recognized field, in display order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Scenario::Order => &["drinkType", "size", "milk", "extras", "name"],
            Scenario::CheckIn => &["mood", "energy", "objectives", "summary"],
        }
    }

    /// Fields the dialogue must fill before the record is complete
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Scenario::Order => &["drinkType", "size", "milk", "name"],
            Scenario::CheckIn => &["mood", "energy", "objectives"],
        }
    }

    /// Message type tag used on the data channel
    pub fn message_type(&self) -> &'static str {
        match self {
            Scenario::Order => "order_update",
            Scenario::CheckIn => "checkin_update",
        }
    }

    /// Key the record is nested under in a broadcast payload
    pub fn payload_key(&self) -> &'static str {
        match self {
            Scenario::Order => "order",
            Scenario::CheckIn => "checkin",
        }
    }

    pub fn is_recognized(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Order => write!(f, "order"),
            Scenario::CheckIn => write!(f, "checkin"),
        }
    }
}

/// Coerce a field value into text; `null` means "no value supplied"
pub fn value_as_text(value: &FieldValue) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_as_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

/// Coerce a field value into a list of strings
///
/// Arrays keep their order; a plain string is read as a comma separated list.
/// A value with no usable items counts as no value, like null, so it never
/// clears a list that was already filled.
pub fn value_as_list(value: &FieldValue) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Null => return None,
        Value::Array(items) => items
            .iter()
            .filter_map(value_as_text)
            .map(|item| normalize_whitespace(&item))
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(s) => split_list(s),
        other => vec![other.to_string()],
    };
    Some(items).filter(|items| !items.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_wire_names() {
        assert_eq!(Scenario::Order.message_type(), "order_update");
        assert_eq!(Scenario::Order.payload_key(), "order");
        assert_eq!(Scenario::CheckIn.message_type(), "checkin_update");
        assert_eq!(Scenario::CheckIn.payload_key(), "checkin");
    }

    #[test]
    fn test_required_fields_are_recognized() {
        for scenario in [Scenario::Order, Scenario::CheckIn] {
            for field in scenario.required_fields() {
                assert!(scenario.is_recognized(field));
            }
        }
        assert!(!Scenario::Order.is_recognized("mood"));
    }

    #[test]
    fn test_value_as_text() {
        assert_eq!(value_as_text(&json!("latte")), Some("latte".to_string()));
        assert_eq!(value_as_text(&json!(12)), Some("12".to_string()));
        assert_eq!(value_as_text(&json!(null)), None);
        assert_eq!(value_as_text(&json!(["a", "b"])), Some("a, b".to_string()));
    }

    #[test]
    fn test_value_as_list() {
        assert_eq!(
            value_as_list(&json!(["vanilla syrup", " extra shot "])),
            Some(vec!["vanilla syrup".to_string(), "extra shot".to_string()])
        );
        assert_eq!(
            value_as_list(&json!("finish report, go for a walk")),
            Some(vec!["finish report".to_string(), "go for a walk".to_string()])
        );
        assert_eq!(value_as_list(&json!(null)), None);
        assert_eq!(value_as_list(&json!("")), None);
        assert_eq!(value_as_list(&json!(" , ")), None);
        assert_eq!(value_as_list(&json!([])), None);
    }
}
