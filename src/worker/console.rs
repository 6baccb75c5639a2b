//! Console mode
//!
//! Runs one session without a real-time transport. Standard output plays the
//! data channel: every broadcast is written as one JSON line, next to the
//! agent's greeting and tool results. Session events are read as JSON lines
//! from standard input until it closes.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{entrypoint, prewarm, AgentSession, JobContext, JobProcess, SessionEvent};
use crate::agents::AgentKind;
use crate::config::Settings;
use crate::services::{DataChannel, PublisherStats};
use crate::utils::errors::Result;

/// Line-oriented data channel over any async writer
pub struct ConsoleChannel<W> {
    out: Arc<Mutex<W>>,
}

impl ConsoleChannel<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(Arc::new(Mutex::new(tokio::io::stdout())))
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleChannel<W> {
    pub fn new(out: Arc<Mutex<W>>) -> Self {
        Self { out }
    }

    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(bytes).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }

    /// Write one JSON value as a line
    pub async fn write_line(&self, value: &Value) -> Result<()> {
        self.write_bytes(&serde_json::to_vec(value)?).await
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> DataChannel for ConsoleChannel<W> {
    async fn publish_data(&self, payload: Vec<u8>, _reliable: bool) -> Result<()> {
        self.write_bytes(&payload).await
    }
}

/// Feed JSON-line events to a session until the reader is exhausted
///
/// Lines that are not valid events are logged and skipped. Returns the number
/// of events handled.
pub async fn run_events<R, W>(session: &mut AgentSession, reader: R, console: &ConsoleChannel<W>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: SessionEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable session event");
                continue;
            }
        };

        let tool = match &event {
            SessionEvent::ToolCall(call) => Some(call.name.clone()),
            _ => None,
        };

        if let Some(output) = session.handle_event(event).await {
            let name = tool.unwrap_or_default();
            console
                .write_line(&json!({"type": "tool_result", "name": name, "output": output}))
                .await?;
        }
        handled += 1;
    }

    debug!(session_id = %session.session_id(), handled = handled, "Console input closed");
    Ok(handled)
}

/// Run a whole session on standard input and output
pub async fn run_console(kind: AgentKind, settings: &Settings, room: Option<String>) -> Result<PublisherStats> {
    let mut process = JobProcess::new();
    prewarm(&mut process);

    let console = Arc::new(ConsoleChannel::stdout());
    let room = room.unwrap_or_else(|| format!("console_{}", kind));
    let ctx = JobContext::new(room, Some(console.clone() as Arc<dyn DataChannel>), Arc::new(process));

    let mut session = entrypoint(ctx, kind, settings).await?;
    console
        .write_line(&json!({"type": "agent_say", "text": session.greeting()}))
        .await?;

    let handled = run_events(&mut session, BufReader::new(tokio::io::stdin()), &*console).await?;
    info!(events = handled, "Console session finished");

    Ok(session.shutdown().await)
}
