//! Coffee order model

use serde::{Deserialize, Serialize};
use super::scenario::{value_as_list, value_as_text, FieldValue, Scenario};
use super::SlotRecord;

/// Order collected by the barista agent
///
/// Serialized keys match the frontend receipt and the saved order files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderState {
    pub drink_type: Option<String>,
    pub size: Option<String>,
    pub milk: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    pub name: Option<String>,
}

impl SlotRecord for OrderState {
    const SCENARIO: Scenario = Scenario::Order;

    fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "extras" => match value_as_list(value) {
                Some(extras) => {
                    self.extras = extras;
                    true
                }
                None => false,
            },
            "drinkType" | "size" | "milk" | "name" => {
                let Some(text) = value_as_text(value) else {
                    return false;
                };
                let slot = match field {
                    "drinkType" => &mut self.drink_type,
                    "size" => &mut self.size,
                    "milk" => &mut self.milk,
                    _ => &mut self.name,
                };
                *slot = Some(text);
                true
            }
            _ => false,
        }
    }

    fn is_filled(&self, field: &str) -> bool {
        match field {
            "drinkType" => self.drink_type.is_some(),
            "size" => self.size.is_some(),
            "milk" => self.milk.is_some(),
            "extras" => !self.extras.is_empty(),
            "name" => self.name.is_some(),
            _ => false,
        }
    }
}
