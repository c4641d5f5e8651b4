use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::Display;

/// Speaking rate used when the caller does not ask for one.
pub const DEFAULT_LOCAL_RATE: f64 = 0.9;

/// Per-call speech shaping. Unset fields fall back to backend defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    /// Multiplier applied on top of the user's speech volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl SpeechOptions {
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

/// A resolved request handed to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub options: SpeechOptions,
    /// Final playback volume in `0.0..=1.0`.
    pub volume: f64,
}

impl Utterance {
    /// Builds an utterance, scaling the option multiplier by the user volume.
    pub fn new(text: impl Into<String>, options: SpeechOptions, speech_volume: f64) -> Self {
        let volume = (speech_volume * options.volume.unwrap_or(1.0)).clamp(0.0, 1.0);
        Self {
            text: text.into(),
            options,
            volume,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    Remote,
    Local,
}

/// How a `speak` call ended. Delivered exactly once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Spoken(BackendKind),
    /// A newer utterance or a stop request cut this one off.
    Interrupted,
    /// Speech is switched off in the user's preferences.
    Muted,
    /// Every available backend failed.
    Failed(String),
}

impl SpeechOutcome {
    pub fn is_spoken(&self) -> bool {
        matches!(self, Self::Spoken(_))
    }
}

/// Encoded audio returned by a remote synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Arc<Vec<u8>>,
    pub content_type: String,
}

impl AudioClip {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data: Arc::new(data),
            content_type: content_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension matching the content type, used when handing the clip
    /// to an external player.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/ogg" => "ogg",
            _ => "mp3",
        }
    }
}

/// One request to a remote text-to-speech service.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    /// Overrides the configured voice.
    pub voice_id: Option<String>,
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterance_volume_is_scaled_and_clamped() {
        let utterance = Utterance::new("hi", SpeechOptions::default().with_volume(0.5), 0.8);
        assert!((utterance.volume - 0.4).abs() < 1e-9);

        let utterance = Utterance::new("hi", SpeechOptions::default().with_volume(3.0), 0.8);
        assert_eq!(utterance.volume, 1.0);

        let utterance = Utterance::new("hi", SpeechOptions::default(), 0.8);
        assert!((utterance.volume - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_clip_extension() {
        assert_eq!(AudioClip::new(vec![1], "audio/mpeg").extension(), "mp3");
        assert_eq!(AudioClip::new(vec![1], "audio/wav").extension(), "wav");
        assert!(AudioClip::new(vec![], "audio/mpeg").is_empty());
    }
}
