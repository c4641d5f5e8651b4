//! Configuration domain models.
//!
//! `RootConfig` is loaded from `config.toml`; `SecretConfig` holds API keys and
//! is loaded separately so it never ends up in logs or the main config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TTS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";
/// "Lily", a calm and soothing voice.
pub const DEFAULT_TTS_VOICE: &str = "pFZP5JQG7iQjIQuC4Bku";

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Remote text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_stability")]
    pub stability: f64,
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f64,
    #[serde(default = "default_style")]
    pub style: f64,
    #[serde(default = "default_true")]
    pub use_speaker_boost: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_TTS_BASE_URL.to_string()
}

fn default_model_id() -> String {
    DEFAULT_TTS_MODEL.to_string()
}

fn default_voice_id() -> String {
    DEFAULT_TTS_VOICE.to_string()
}

fn default_stability() -> f64 {
    0.75
}

fn default_similarity_boost() -> f64 {
    0.85
}

fn default_style() -> f64 {
    0.2
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model_id: default_model_id(),
            voice_id: default_voice_id(),
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: default_style(),
            use_speaker_boost: true,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// External programs used for local speech and audio playback.
///
/// `None` means "auto-detect" from a list of well-known programs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_command: Option<String>,
    /// Player for speech clips and ambient loops. Ambient tracks are streamed
    /// and looped, which only `mpv` and `ffplay` support; with `afplay` or
    /// `paplay` speech still plays but ambient sound stays silent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_command: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Overrides the platform data directory for the key-value store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Root of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub elevenlabs: Option<ElevenLabsSecret>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsSecret {
    pub api_key: String,
}

impl SecretConfig {
    /// Returns the ElevenLabs key if one is configured and non-blank.
    pub fn elevenlabs_api_key(&self) -> Option<&str> {
        self.elevenlabs
            .as_ref()
            .map(|c| c.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [speech]
            voice_id = "custom-voice"

            [audio]
            player_command = "mpv"
            "#,
        )
        .unwrap();

        assert_eq!(config.speech.voice_id, "custom-voice");
        assert_eq!(config.speech.model_id, DEFAULT_TTS_MODEL);
        assert_eq!(config.speech.stability, 0.75);
        assert!(config.speech.use_speaker_boost);
        assert_eq!(config.audio.player_command.as_deref(), Some("mpv"));
        assert!(config.audio.speech_command.is_none());
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let secrets: SecretConfig =
            serde_json::from_str(r#"{"elevenlabs": {"api_key": "   "}}"#).unwrap();
        assert!(secrets.elevenlabs_api_key().is_none());

        let secrets: SecretConfig =
            serde_json::from_str(r#"{"elevenlabs": {"api_key": "sk-test"}}"#).unwrap();
        assert_eq!(secrets.elevenlabs_api_key(), Some("sk-test"));
    }
}
