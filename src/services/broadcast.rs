//! Broadcast publisher implementation
//!
//! This service pushes the current conversation record to the frontend over
//! the room's data channel. Each session owns its own publisher, built with
//! the session's connection handle. Messages go through a bounded queue that
//! a single task drains in order, and every payload carries a monotonic
//! `seq` so the frontend can drop anything older than what it already shows.
//!
//! Broadcasting is a side channel: nothing here ever fails the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::Scenario;
use crate::state::ConversationState;
use crate::utils::errors::Result;

/// The room's data channel, provided by the real-time transport
#[async_trait]
pub trait DataChannel: Send + Sync {
    /// Send one payload to every connected participant
    async fn publish_data(&self, payload: Vec<u8>, reliable: bool) -> Result<()>;
}

/// One queued message
#[derive(Debug)]
struct Outgoing {
    seq: u64,
    message_type: &'static str,
    payload: Vec<u8>,
}

/// Delivery counters reported when the publisher closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublisherStats {
    pub sent: u64,
    pub failed: u64,
}

/// Per-session broadcast publisher
#[derive(Debug)]
pub struct BroadcastPublisher {
    sender: Option<mpsc::Sender<Outgoing>>,
    drain: Option<JoinHandle<PublisherStats>>,
    seq: AtomicU64,
}

impl BroadcastPublisher {
    /// Create a publisher for a session
    ///
    /// With a connection, a drain task is spawned on the current Tokio
    /// runtime. Without one, every publish is skipped.
    pub fn new(connection: Option<Arc<dyn DataChannel>>, queue_capacity: usize) -> Self {
        let Some(channel) = connection else {
            return Self::disconnected();
        };

        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        let drain = tokio::spawn(drain_queue(receiver, channel));

        Self {
            sender: Some(sender),
            drain: Some(drain),
            seq: AtomicU64::new(0),
        }
    }

    /// A publisher with no active connection
    pub fn disconnected() -> Self {
        Self {
            sender: None,
            drain: None,
            seq: AtomicU64::new(0),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }

    /// Sequence number of the last queued message
    pub fn last_seq(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }

    /// Build the wire payload `{"type": ..., "<key>": payload, "seq": n}`
    pub fn encode(scenario: Scenario, payload: &Value, seq: u64) -> Result<Vec<u8>> {
        let mut message = Map::new();
        message.insert("type".to_string(), Value::from(scenario.message_type()));
        message.insert(scenario.payload_key().to_string(), payload.clone());
        message.insert("seq".to_string(), Value::from(seq));
        Ok(serde_json::to_vec(&Value::Object(message))?)
    }

    /// Queue a record for the frontend; best effort, never fails
    ///
    /// Never waits on the transport: when the queue is full the message is
    /// dropped with a warning.
    pub async fn publish(&self, scenario: Scenario, payload: Value) {
        let Some(sender) = &self.sender else {
            debug!(message_type = scenario.message_type(), "No active connection, skipping broadcast");
            return;
        };

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let bytes = match Self::encode(scenario, &payload, seq) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(message_type = scenario.message_type(), seq = seq, error = %e, "Failed to encode broadcast");
                return;
            }
        };

        let outgoing = Outgoing {
            seq,
            message_type: scenario.message_type(),
            payload: bytes,
        };

        match sender.try_send(outgoing) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(message_type = scenario.message_type(), seq = seq, "Broadcast queue full, dropping message");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(message_type = scenario.message_type(), seq = seq, "Broadcast queue closed, dropping message");
            }
        }
    }

    /// Queue the session's current record
    pub async fn publish_state(&self, state: &ConversationState) {
        match state.payload() {
            Ok(payload) => self.publish(state.scenario(), payload).await,
            Err(e) => warn!(session_id = %state.session_id, error = %e, "Failed to serialize conversation state"),
        }
    }

    /// Stop accepting messages and wait until the queue is drained
    pub async fn close(&mut self) -> PublisherStats {
        self.sender.take();

        let Some(drain) = self.drain.take() else {
            return PublisherStats::default();
        };

        match drain.await {
            Ok(stats) => {
                info!(sent = stats.sent, failed = stats.failed, "Broadcast publisher closed");
                stats
            }
            Err(e) => {
                warn!(error = %e, "Broadcast drain task ended abnormally");
                PublisherStats::default()
            }
        }
    }
}

async fn drain_queue(mut receiver: mpsc::Receiver<Outgoing>, channel: Arc<dyn DataChannel>) -> PublisherStats {
    let mut stats = PublisherStats::default();

    while let Some(outgoing) = receiver.recv().await {
        let size = outgoing.payload.len();
        match channel.publish_data(outgoing.payload, true).await {
            Ok(()) => {
                stats.sent += 1;
                debug!(message_type = outgoing.message_type, seq = outgoing.seq, bytes = size, "Broadcast sent");
            }
            Err(e) => {
                stats.failed += 1;
                warn!(message_type = outgoing.message_type, seq = outgoing.seq, error = %e, "Broadcast failed");
            }
        }
    }

    stats
}
