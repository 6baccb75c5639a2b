//! Agent session
//!
//! One session per room. It owns the conversation state, the broadcast
//! publisher and the usage collector, and reacts to the events the agent
//! runtime reports while the conversation runs.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::agents::{AgentKind, PipelineConfig};
use crate::handlers::tools::{handle_tool_call, ToolCall};
use crate::services::usage::log_metrics;
use crate::services::{BroadcastPublisher, PipelineMetrics, PublisherStats, ServiceFactory, UsageCollector};
use crate::state::{ConversationState, SlotFilling, SlotProgress};

/// Callback run once when the session ends
pub type ShutdownCallback = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Events reported by the agent runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The agent finished saying something
    AgentSpeechCommitted {
        #[serde(default)]
        text: String,
    },
    /// The user's turn was transcribed
    UserSpeechCommitted {
        #[serde(default)]
        text: String,
    },
    /// The LLM asked for a tool
    ToolCall(ToolCall),
    /// A plugin reported metrics
    MetricsCollected { metrics: PipelineMetrics },
}

/// Everything a session is built from
pub struct SessionParts {
    pub kind: AgentKind,
    pub room: String,
    pub pipeline: PipelineConfig,
    pub instructions: String,
    pub greeting: String,
    pub services: ServiceFactory,
    pub publisher: BroadcastPublisher,
    pub usage: UsageCollector,
    pub shutdown_callbacks: Vec<ShutdownCallback>,
}

pub struct AgentSession {
    kind: AgentKind,
    room: String,
    pipeline: PipelineConfig,
    instructions: String,
    greeting: String,
    state: ConversationState,
    slots: SlotFilling,
    finalized: bool,
    services: ServiceFactory,
    publisher: BroadcastPublisher,
    usage: UsageCollector,
    shutdown_callbacks: Vec<ShutdownCallback>,
}

impl AgentSession {
    pub fn new(parts: SessionParts) -> Self {
        let state = ConversationState::initialize(parts.kind.scenario());
        debug!(session_id = %state.session_id, room = %parts.room, agent = %parts.kind, "Session state initialized");

        Self {
            kind: parts.kind,
            room: parts.room,
            pipeline: parts.pipeline,
            instructions: parts.instructions,
            greeting: parts.greeting,
            state,
            slots: SlotFilling::new(),
            finalized: false,
            services: parts.services,
            publisher: parts.publisher,
            usage: parts.usage,
            shutdown_callbacks: parts.shutdown_callbacks,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn session_id(&self) -> &str {
        &self.state.session_id
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// First thing the agent says
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ConversationState {
        &mut self.state
    }

    pub fn slots(&self) -> &SlotFilling {
        &self.slots
    }

    pub fn progress(&self) -> SlotProgress {
        self.slots.progress(&self.state, self.finalized)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn mark_finalized(&mut self) {
        self.finalized = true;
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.services
    }

    pub fn publisher(&self) -> &BroadcastPublisher {
        &self.publisher
    }

    pub fn usage(&self) -> &UsageCollector {
        &self.usage
    }

    /// Send the current record to the frontend
    pub async fn broadcast_state(&self) {
        self.publisher.publish_state(&self.state).await;
    }

    /// React to one runtime event; tool calls return the result for the LLM
    pub async fn handle_event(&mut self, event: SessionEvent) -> Option<String> {
        match event {
            SessionEvent::AgentSpeechCommitted { text } => {
                debug!(session_id = %self.session_id(), text = %text, "Agent speech committed");
                self.broadcast_state().await;
                None
            }
            SessionEvent::UserSpeechCommitted { text } => {
                debug!(session_id = %self.session_id(), text = %text, "User speech committed");
                None
            }
            SessionEvent::ToolCall(call) => Some(handle_tool_call(self, &call).await),
            SessionEvent::MetricsCollected { metrics } => {
                log_metrics(&metrics);
                self.usage.collect(&metrics);
                None
            }
        }
    }

    /// Run the shutdown callbacks and drain the publisher
    pub async fn shutdown(mut self) -> PublisherStats {
        info!(session_id = %self.session_id(), room = %self.room, finalized = self.finalized, "Session shutting down");

        for callback in self.shutdown_callbacks.drain(..) {
            callback().await;
        }

        let stats = self.publisher.close().await;
        if stats.failed > 0 {
            warn!(session_id = %self.state.session_id, failed = stats.failed, "Some broadcasts were not delivered");
        }
        stats
    }
}

impl std::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession")
            .field("kind", &self.kind)
            .field("room", &self.room)
            .field("state", &self.state)
            .field("finalized", &self.finalized)
            .field("shutdown_callbacks", &self.shutdown_callbacks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_format() {
        let event: SessionEvent = serde_json::from_value(json!({
            "event": "tool_call",
            "name": "update_order_field",
            "arguments": {"field": "milk", "value": "oat"}
        }))
        .unwrap();
        assert_eq!(
            event,
            SessionEvent::ToolCall(ToolCall::new("update_order_field", json!({"field": "milk", "value": "oat"})))
        );

        let event: SessionEvent = serde_json::from_str(r#"{"event": "agent_speech_committed"}"#).unwrap();
        assert_eq!(event, SessionEvent::AgentSpeechCommitted { text: String::new() });

        let event: SessionEvent = serde_json::from_str(
            r#"{"event": "metrics_collected", "metrics": {"type": "tts", "characters": 12, "audio_duration": 1.5}}"#,
        )
        .unwrap();
        assert!(matches!(event, SessionEvent::MetricsCollected { .. }));
    }
}
