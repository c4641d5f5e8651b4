//! Speech and ambient audio domain.

mod ambient;
mod backend;
mod model;

pub use ambient::{AMBIENT_SOUNDS, AmbientSound, SILENCE, find_ambient};
pub use backend::{AudioOutput, SpeechBackend, TtsClient};
pub use model::{
    AudioClip, BackendKind, DEFAULT_LOCAL_RATE, SpeechOptions, SpeechOutcome, SynthesisRequest,
    Utterance,
};
