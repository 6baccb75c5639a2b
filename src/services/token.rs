//! LiveKit connection details
//!
//! The frontend asks for a room to join before it can talk to an agent. This
//! service picks a fresh room and participant identity, mints a LiveKit
//! access token for them and names the agent to dispatch into the room.

use std::time::Duration;
use livekit_api::access_token::{AccessToken, Claims, TokenVerifier, VideoGrants};
use livekit_protocol::{RoomAgentDispatch, RoomConfiguration};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LiveKitConfig;
use crate::utils::errors::Result;

/// What the frontend needs to join a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    pub server_url: String,
    pub room_name: String,
    pub participant_name: String,
    pub participant_token: String,
}

/// Mints access tokens with the project's API key and secret
#[derive(Clone)]
pub struct TokenIssuer {
    server_url: String,
    api_key: String,
    api_secret: String,
    ttl_seconds: u64,
    default_agent_name: String,
}

impl TokenIssuer {
    /// Build an issuer; fails naming the first missing LiveKit variable
    pub fn from_config(config: &LiveKitConfig) -> Result<Self> {
        let (server_url, api_key, api_secret) = config.credentials()?;
        Ok(Self {
            server_url: server_url.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            ttl_seconds: config.token_ttl_seconds,
            default_agent_name: config.default_agent_name.clone(),
        })
    }

    /// Fresh room and identity with a token that dispatches `agent_name`
    pub fn connection_details(&self, agent_name: Option<&str>) -> Result<ConnectionDetails> {
        let agent_name = agent_name
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_agent_name.as_str());

        let mut rng = rand::thread_rng();
        let room_name = format!("voice_room_{}", rng.gen_range(0..100_000));
        let identity = format!("user_{}", rng.gen_range(0..100_000));

        let participant_token = self.mint(&identity, &room_name, Some(agent_name))?;
        info!(room = %room_name, identity = %identity, agent = %agent_name, "Issued connection details");

        Ok(ConnectionDetails {
            server_url: self.server_url.clone(),
            room_name,
            participant_name: identity,
            participant_token,
        })
    }

    /// Sign a token for `identity` in `room`
    pub fn mint(&self, identity: &str, room: &str, agent_name: Option<&str>) -> Result<String> {
        let mut token = AccessToken::with_api_key(&self.api_key, &self.api_secret)
            .with_identity(identity)
            .with_name(identity)
            .with_grants(VideoGrants {
                room_join: true,
                room: room.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.ttl_seconds));

        if let Some(name) = agent_name {
            token = token.with_room_config(RoomConfiguration {
                agents: vec![RoomAgentDispatch {
                    agent_name: name.to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            });
        }

        Ok(token.to_jwt()?)
    }

    /// Check a token's signature and expiry and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        Ok(TokenVerifier::with_api_key(&self.api_key, &self.api_secret).verify(token)?)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
