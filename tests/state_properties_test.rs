//! Conversation state properties

use proptest::prelude::*;
use serde_json::{json, Value};
use VoiceBuddy::models::Scenario;
use VoiceBuddy::state::SlotFilling;
use VoiceBuddy::ConversationState;

fn scenario() -> impl Strategy<Value = Scenario> {
    prop_oneof![Just(Scenario::Order), Just(Scenario::CheckIn)]
}

fn text_field(scenario: Scenario) -> impl Strategy<Value = &'static str> {
    let fields: Vec<&'static str> = scenario
        .fields()
        .iter()
        .copied()
        .filter(|f| *f != "extras" && *f != "objectives")
        .collect();
    prop::sample::select(fields)
}

proptest! {
    #[test]
    fn unknown_fields_never_change_state(
        scenario in scenario(),
        field in "[a-zA-Z_]{1,16}",
        value in ".*",
    ) {
        prop_assume!(!scenario.is_recognized(&field));
        let state = ConversationState::initialize(scenario);
        let before = state.payload().unwrap();
        let after = state.update(&field, Value::from(value)).payload().unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn last_write_wins(
        (scenario, field) in scenario().prop_flat_map(|s| (Just(s), text_field(s))),
        values in prop::collection::vec("[a-z ]{1,12}", 1..6),
    ) {
        let mut state = ConversationState::initialize(scenario);
        for value in &values {
            state = state.update(field, json!(value));
        }
        prop_assert_eq!(state.get(field), Some(json!(values.last().unwrap())));
    }

    #[test]
    fn payload_always_has_every_field(scenario in scenario(), filled in prop::collection::vec(any::<bool>(), 5)) {
        let mut state = ConversationState::initialize(scenario);
        for (field, fill) in scenario.fields().iter().zip(filled) {
            if fill {
                state.set_field(field, &json!("x"));
            }
        }
        let payload = state.payload().unwrap();
        for field in scenario.fields() {
            prop_assert!(payload.get(*field).is_some());
        }
        let missing = SlotFilling::new().missing_fields(&state);
        prop_assert!(missing.iter().all(|f| !state.is_filled(f)));
    }
}
