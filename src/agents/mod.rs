//! Scripted agents
//!
//! Two agents run on the same worker: the barista that takes a coffee order
//! and the wellness companion that runs a daily check-in. Each one names the
//! record it fills in, the pipeline plugins it speaks through, its
//! instructions and the tools the LLM may call.

pub mod pipeline;
pub mod prompts;

pub use pipeline::{PipelineConfig, VadModel};

use serde::{Deserialize, Serialize};
use crate::handlers::tools::{tool_specs, ToolSpec};
use crate::models::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Barista,
    Wellness,
}

impl AgentKind {
    /// Name the worker registers under; used for explicit dispatch
    pub fn worker_name(&self) -> &'static str {
        match self {
            AgentKind::Barista => "myagent",
            AgentKind::Wellness => "wellness-companion",
        }
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            AgentKind::Barista => Scenario::Order,
            AgentKind::Wellness => Scenario::CheckIn,
        }
    }

    pub fn pipeline(&self, vad: VadModel) -> PipelineConfig {
        match self {
            AgentKind::Barista => PipelineConfig::barista(vad),
            AgentKind::Wellness => PipelineConfig::wellness(vad),
        }
    }

    pub fn tools(&self) -> Vec<ToolSpec> {
        tool_specs(*self)
    }

    /// Agent for a worker name, as used in dispatch requests
    pub fn from_worker_name(name: &str) -> Option<Self> {
        [AgentKind::Barista, AgentKind::Wellness]
            .into_iter()
            .find(|kind| kind.worker_name() == name)
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentKind::Barista => write!(f, "barista"),
            AgentKind::Wellness => write!(f, "wellness"),
        }
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "barista" | "order" => Ok(AgentKind::Barista),
            "wellness" | "checkin" | "check-in" => Ok(AgentKind::Wellness),
            other => AgentKind::from_worker_name(other)
                .ok_or_else(|| format!("unknown agent '{}', expected barista or wellness", s)),
        }
    }
}
