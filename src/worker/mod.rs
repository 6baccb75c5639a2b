//! Worker entrypoint
//!
//! The agent runtime prewarms each worker process once, then calls
//! [`entrypoint`] for every room the worker is dispatched to. A session is
//! built from the job context, announces its empty record and hands back the
//! greeting; the runtime then feeds it [`SessionEvent`]s until the room closes.

pub mod console;
pub mod session;

pub use session::{AgentSession, SessionEvent, SessionParts, ShutdownCallback};

use std::sync::Arc;
use futures::future::BoxFuture;
use tracing::{info, warn};

use crate::agents::prompts;
use crate::agents::{AgentKind, VadModel};
use crate::config::Settings;
use crate::services::{BroadcastPublisher, DataChannel, ServiceFactory, UsageCollector};
use crate::storage::format_history_context;
use crate::utils::errors::Result;
use crate::utils::logging::log_session_error;

/// Process-local data shared by every job on a worker
#[derive(Debug, Clone, Default)]
pub struct JobProcess {
    vad: Option<VadModel>,
}

impl JobProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vad(&self) -> Option<&VadModel> {
        self.vad.as_ref()
    }
}

/// Load what every session needs before the first job arrives
pub fn prewarm(process: &mut JobProcess) {
    let vad = VadModel::silero();
    info!(provider = %vad.provider, "VAD model loaded");
    process.vad = Some(vad);
}

/// One dispatched job: a room and its data channel
pub struct JobContext {
    room_name: String,
    connection: Option<Arc<dyn DataChannel>>,
    process: Arc<JobProcess>,
    shutdown_callbacks: Vec<ShutdownCallback>,
}

impl JobContext {
    pub fn new(
        room_name: impl Into<String>,
        connection: Option<Arc<dyn DataChannel>>,
        process: Arc<JobProcess>,
    ) -> Self {
        Self {
            room_name: room_name.into(),
            connection,
            process,
            shutdown_callbacks: Vec::new(),
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn process(&self) -> &JobProcess {
        &self.process
    }

    /// The room's data channel, if the transport connected
    pub fn connect(&self) -> Option<Arc<dyn DataChannel>> {
        match &self.connection {
            Some(channel) => {
                info!(room = %self.room_name, "Connected to room");
                Some(channel.clone())
            }
            None => {
                warn!(room = %self.room_name, "No room connection, broadcasts will be skipped");
                None
            }
        }
    }

    /// Register a callback to run once when the session ends
    pub fn add_shutdown_callback<F>(&mut self, callback: F)
    where
        F: FnOnce() -> BoxFuture<'static, ()> + Send + 'static,
    {
        self.shutdown_callbacks.push(Box::new(callback));
    }
}

/// Start a session for `kind` in the job's room
///
/// Fails with a configuration error when `DEEPGRAM_API_KEY` is missing. Any
/// failure is logged with the room name before it is returned.
pub async fn entrypoint(ctx: JobContext, kind: AgentKind, settings: &Settings) -> Result<AgentSession> {
    let room = ctx.room_name.clone();
    match start_session(ctx, kind, settings).await {
        Ok(session) => Ok(session),
        Err(e) => {
            log_session_error(&room, &e.to_string(), Some(kind.worker_name()));
            Err(e)
        }
    }
}

async fn start_session(mut ctx: JobContext, kind: AgentKind, settings: &Settings) -> Result<AgentSession> {
    info!(room = %ctx.room_name, agent = kind.worker_name(), "Agent started for room");

    settings.deepgram_api_key()?;

    let vad = match ctx.process().vad() {
        Some(vad) => vad.clone(),
        None => {
            warn!(room = %ctx.room_name, "Worker was not prewarmed, loading VAD model now");
            VadModel::silero()
        }
    };
    let pipeline = kind.pipeline(vad);

    let services = ServiceFactory::new(settings);
    let (instructions, greeting) = match kind {
        AgentKind::Barista => (prompts::barista_instructions(), prompts::barista_greeting()),
        AgentKind::Wellness => {
            let history = services.wellness.load_history().await;
            info!(room = %ctx.room_name, previous_checkins = history.len(), "Wellness history loaded");
            (
                prompts::wellness_instructions(&format_history_context(&history)),
                prompts::wellness_greeting(!history.is_empty()),
            )
        }
    };

    let usage = UsageCollector::new();
    let summary_source = usage.clone();
    ctx.add_shutdown_callback(move || {
        Box::pin(async move {
            info!("Usage summary: {}", summary_source.summary());
        })
    });

    let publisher = BroadcastPublisher::new(ctx.connect(), services.broadcast_capacity);
    let session = AgentSession::new(SessionParts {
        kind,
        room: ctx.room_name.clone(),
        pipeline,
        instructions,
        greeting,
        services,
        publisher,
        usage,
        shutdown_callbacks: std::mem::take(&mut ctx.shutdown_callbacks),
    });

    info!(session_id = %session.session_id(), room = %session.room(), "Session started");
    session.broadcast_state().await;

    Ok(session)
}
