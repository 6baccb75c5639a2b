//! Wellness check-in models

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use super::scenario::{value_as_list, value_as_text, FieldValue, Scenario};
use super::SlotRecord;

/// Check-in being filled in during a wellness session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInState {
    pub mood: Option<String>,
    pub energy: Option<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub summary: Option<String>,
}

impl SlotRecord for CheckInState {
    const SCENARIO: Scenario = Scenario::CheckIn;

    fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "objectives" => match value_as_list(value) {
                Some(objectives) => {
                    self.objectives = objectives;
                    true
                }
                None => false,
            },
            "mood" | "energy" | "summary" => {
                let Some(text) = value_as_text(value) else {
                    return false;
                };
                let slot = match field {
                    "mood" => &mut self.mood,
                    "energy" => &mut self.energy,
                    _ => &mut self.summary,
                };
                *slot = Some(text);
                true
            }
            _ => false,
        }
    }

    fn is_filled(&self, field: &str) -> bool {
        match field {
            "mood" => self.mood.is_some(),
            "energy" => self.energy.is_some(),
            "objectives" => !self.objectives.is_empty(),
            "summary" => self.summary.is_some(),
            _ => false,
        }
    }
}

/// A completed check-in as stored in the wellness log
///
/// Entries are written once and never changed. `energy`, `objectives` and
/// `summary` default when absent so older logs still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub energy: Option<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current local time
    pub fn new(mood: String, energy: Option<String>, objectives: Vec<String>, summary: Option<String>) -> Self {
        Self::at(Local::now().naive_local(), mood, energy, objectives, summary)
    }

    /// Create an entry stamped with an explicit local time
    pub fn at(
        timestamp: NaiveDateTime,
        mood: String,
        energy: Option<String>,
        objectives: Vec<String>,
        summary: Option<String>,
    ) -> Self {
        Self {
            date: timestamp.date(),
            timestamp,
            mood,
            energy,
            objectives,
            summary,
        }
    }
}

impl From<&HistoryEntry> for CheckInState {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            mood: Some(entry.mood.clone()),
            energy: entry.energy.clone(),
            objectives: entry.objectives.clone(),
            summary: entry.summary.clone(),
        }
    }
}
