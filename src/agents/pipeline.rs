//! Speech pipeline descriptors
//!
//! Speech-to-text, the LLM, text-to-speech, voice activity detection and turn
//! detection are all provided by external plugins. These types record which
//! plugin each agent uses and with which fixed parameters, so the worker can
//! hand them to the agent runtime and log what a session is running with.

use serde::{Deserialize, Serialize};

/// Speech-to-text plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SttPlugin {
    pub provider: String,
    pub model: String,
}

/// Language model plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmPlugin {
    pub provider: String,
    pub model: String,
    pub temperature: Option<f64>,
}

/// Text-to-speech plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum TtsPlugin {
    Murf {
        voice: String,
        style: String,
        min_sentence_len: usize,
        text_pacing: bool,
    },
    Deepgram {
        model: String,
    },
}

/// Voice activity detection model, loaded once per worker process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VadModel {
    pub provider: String,
    pub min_speech_duration: f64,
    pub min_silence_duration: f64,
    pub activation_threshold: f64,
}

impl VadModel {
    /// Silero VAD with its stock thresholds
    pub fn silero() -> Self {
        Self {
            provider: "silero".to_string(),
            min_speech_duration: 0.05,
            min_silence_duration: 0.55,
            activation_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDetection {
    Multilingual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseCancellation {
    Bvc,
}

/// Everything the agent runtime needs to assemble a session pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub stt: SttPlugin,
    pub llm: LlmPlugin,
    pub tts: TtsPlugin,
    pub vad: VadModel,
    pub turn_detection: Option<TurnDetection>,
    pub noise_cancellation: Option<NoiseCancellation>,
    pub preemptive_generation: bool,
    pub min_endpointing_delay: Option<f64>,
    pub allow_interruptions: bool,
}

fn deepgram_nova() -> SttPlugin {
    SttPlugin {
        provider: "deepgram".to_string(),
        model: "nova-3".to_string(),
    }
}

fn gemini_flash(temperature: Option<f64>) -> LlmPlugin {
    LlmPlugin {
        provider: "google".to_string(),
        model: "gemini-2.5-flash".to_string(),
        temperature,
    }
}

impl PipelineConfig {
    /// Barista: Murf voice with sentence pacing, multilingual turn detection
    /// and background voice cancellation
    pub fn barista(vad: VadModel) -> Self {
        Self {
            stt: deepgram_nova(),
            llm: gemini_flash(None),
            tts: TtsPlugin::Murf {
                voice: "en-US-matthew".to_string(),
                style: "Conversation".to_string(),
                min_sentence_len: 2,
                text_pacing: true,
            },
            vad,
            turn_detection: Some(TurnDetection::Multilingual),
            noise_cancellation: Some(NoiseCancellation::Bvc),
            preemptive_generation: true,
            min_endpointing_delay: None,
            allow_interruptions: true,
        }
    }

    /// Wellness companion: warmer LLM temperature and a Deepgram Aura voice
    pub fn wellness(vad: VadModel) -> Self {
        Self {
            stt: deepgram_nova(),
            llm: gemini_flash(Some(0.8)),
            tts: TtsPlugin::Deepgram {
                model: "aura-asteria-en".to_string(),
            },
            vad,
            turn_detection: None,
            noise_cancellation: None,
            preemptive_generation: true,
            min_endpointing_delay: Some(0.5),
            allow_interruptions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barista_pipeline() {
        let pipeline = PipelineConfig::barista(VadModel::silero());
        assert_eq!(pipeline.stt.model, "nova-3");
        assert_eq!(pipeline.llm.model, "gemini-2.5-flash");
        assert_eq!(pipeline.turn_detection, Some(TurnDetection::Multilingual));
        assert!(matches!(pipeline.tts, TtsPlugin::Murf { ref voice, .. } if voice == "en-US-matthew"));
    }

    #[test]
    fn test_wellness_pipeline() {
        let pipeline = PipelineConfig::wellness(VadModel::silero());
        assert_eq!(pipeline.llm.temperature, Some(0.8));
        assert_eq!(pipeline.min_endpointing_delay, Some(0.5));
        assert_eq!(pipeline.tts, TtsPlugin::Deepgram { model: "aura-asteria-en".to_string() });
        assert!(pipeline.noise_cancellation.is_none());
    }
}
