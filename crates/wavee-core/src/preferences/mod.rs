//! Audio preferences persisted between runs.

use serde::{Deserialize, Serialize};

use crate::speech::SILENCE;
use crate::store::{StoreRecord, keys};

pub const DEFAULT_SPEECH_VOLUME: f64 = 0.8;
pub const DEFAULT_AMBIENT_VOLUME: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPreferences {
    #[serde(default = "default_true")]
    pub speech_enabled: bool,
    #[serde(default = "default_ambient_sound_id")]
    pub ambient_sound_id: String,
    #[serde(default = "default_speech_volume")]
    pub speech_volume: f64,
    #[serde(default = "default_ambient_volume")]
    pub ambient_volume: f64,
}

fn default_true() -> bool {
    true
}

fn default_ambient_sound_id() -> String {
    SILENCE.to_string()
}

fn default_speech_volume() -> f64 {
    DEFAULT_SPEECH_VOLUME
}

fn default_ambient_volume() -> f64 {
    DEFAULT_AMBIENT_VOLUME
}

impl Default for AudioPreferences {
    fn default() -> Self {
        Self {
            speech_enabled: true,
            ambient_sound_id: default_ambient_sound_id(),
            speech_volume: DEFAULT_SPEECH_VOLUME,
            ambient_volume: DEFAULT_AMBIENT_VOLUME,
        }
    }
}

impl StoreRecord for AudioPreferences {
    const KEY: &'static str = keys::AUDIO_PREFERENCES;
}

impl AudioPreferences {
    pub fn set_speech_volume(&mut self, volume: f64) {
        self.speech_volume = clamp_volume(volume);
    }

    pub fn set_ambient_volume(&mut self, volume: f64) {
        self.ambient_volume = clamp_volume(volume);
    }

    /// Re-applies the volume bounds to values read from disk.
    pub fn normalized(mut self) -> Self {
        self.speech_volume = clamp_volume(self.speech_volume);
        self.ambient_volume = clamp_volume(self.ambient_volume);
        self
    }
}

/// Clamps to `0.0..=1.0`; NaN becomes silence.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
