//! Data channel doubles
//!
//! Stand-ins for the room's data channel that record what the publisher sent
//! or fail every send.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use VoiceBuddy::services::DataChannel;
use VoiceBuddy::{Result, VoiceBuddyError};

/// Records every payload it receives, decoded as JSON
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(Value, bool)>>,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Decoded payloads in the order they arrived
    pub async fn messages(&self) -> Vec<Value> {
        self.sent.lock().await.iter().map(|(value, _)| value.clone()).collect()
    }

    pub async fn all_reliable(&self) -> bool {
        self.sent.lock().await.iter().all(|(_, reliable)| *reliable)
    }

    /// Last payload of the given message type
    pub async fn last_of(&self, message_type: &str) -> Option<Value> {
        self.messages()
            .await
            .into_iter()
            .rev()
            .find(|message| message["type"] == message_type)
    }
}

#[async_trait]
impl DataChannel for RecordingChannel {
    async fn publish_data(&self, payload: Vec<u8>, reliable: bool) -> Result<()> {
        let value: Value = serde_json::from_slice(&payload)?;
        self.sent.lock().await.push((value, reliable));
        Ok(())
    }
}

/// A channel whose participant already left
pub struct FailingChannel;

#[async_trait]
impl DataChannel for FailingChannel {
    async fn publish_data(&self, _payload: Vec<u8>, _reliable: bool) -> Result<()> {
        Err(VoiceBuddyError::Channel("participant left the room".to_string()))
    }
}
