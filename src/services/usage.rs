//! Pipeline usage metrics
//!
//! The speech and language plugins report metrics as the session runs. They
//! are logged as they arrive and summed into a usage summary that is logged
//! once when the session shuts down.

use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One metrics report from the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineMetrics {
    Llm {
        prompt_tokens: u64,
        completion_tokens: u64,
        #[serde(default)]
        ttft: Option<f64>,
    },
    Tts {
        characters: u64,
        #[serde(default)]
        audio_duration: f64,
    },
    Stt {
        audio_duration: f64,
    },
    Eou {
        end_of_utterance_delay: f64,
    },
}

/// Totals over a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub llm_prompt_tokens: u64,
    pub llm_completion_tokens: u64,
    pub tts_characters_count: u64,
    pub tts_audio_duration: f64,
    pub stt_audio_duration: f64,
}

impl std::fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "llm_prompt_tokens={} llm_completion_tokens={} tts_characters_count={} tts_audio_duration={:.2}s stt_audio_duration={:.2}s",
            self.llm_prompt_tokens,
            self.llm_completion_tokens,
            self.tts_characters_count,
            self.tts_audio_duration,
            self.stt_audio_duration
        )
    }
}

/// Shared usage accumulator; clones see the same totals
#[derive(Debug, Clone, Default)]
pub struct UsageCollector {
    summary: Arc<Mutex<UsageSummary>>,
}

impl UsageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&self, metrics: &PipelineMetrics) {
        let mut summary = self.summary.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match metrics {
            PipelineMetrics::Llm { prompt_tokens, completion_tokens, .. } => {
                summary.llm_prompt_tokens += prompt_tokens;
                summary.llm_completion_tokens += completion_tokens;
            }
            PipelineMetrics::Tts { characters, audio_duration } => {
                summary.tts_characters_count += characters;
                summary.tts_audio_duration += audio_duration;
            }
            PipelineMetrics::Stt { audio_duration } => {
                summary.stt_audio_duration += audio_duration;
            }
            PipelineMetrics::Eou { .. } => {}
        }
    }

    pub fn summary(&self) -> UsageSummary {
        *self.summary.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Log a single metrics report
pub fn log_metrics(metrics: &PipelineMetrics) {
    match metrics {
        PipelineMetrics::Llm { prompt_tokens, completion_tokens, ttft } => {
            debug!(prompt_tokens = prompt_tokens, completion_tokens = completion_tokens, ttft = ?ttft, "LLM metrics");
        }
        PipelineMetrics::Tts { characters, audio_duration } => {
            debug!(characters = characters, audio_duration = audio_duration, "TTS metrics");
        }
        PipelineMetrics::Stt { audio_duration } => {
            debug!(audio_duration = audio_duration, "STT metrics");
        }
        PipelineMetrics::Eou { end_of_utterance_delay } => {
            debug!(end_of_utterance_delay = end_of_utterance_delay, "End of utterance metrics");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_sums_reports() {
        let usage = UsageCollector::new();
        let shared = usage.clone();

        usage.collect(&PipelineMetrics::Llm { prompt_tokens: 120, completion_tokens: 30, ttft: Some(0.4) });
        usage.collect(&PipelineMetrics::Llm { prompt_tokens: 80, completion_tokens: 20, ttft: None });
        usage.collect(&PipelineMetrics::Tts { characters: 64, audio_duration: 3.5 });
        usage.collect(&PipelineMetrics::Eou { end_of_utterance_delay: 0.2 });

        let summary = shared.summary();
        assert_eq!(summary.llm_prompt_tokens, 200);
        assert_eq!(summary.llm_completion_tokens, 50);
        assert_eq!(summary.tts_characters_count, 64);
    }

    #[test]
    fn test_metrics_wire_format() {
        let metrics: PipelineMetrics =
            serde_json::from_str(r#"{"type": "stt", "audio_duration": 2.25}"#).unwrap();
        assert_eq!(metrics, PipelineMetrics::Stt { audio_duration: 2.25 });
    }
}
