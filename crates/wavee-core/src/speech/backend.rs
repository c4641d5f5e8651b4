//! Backend traits for the speech fallback chain.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::model::{AudioClip, BackendKind, SynthesisRequest, Utterance};
use crate::error::Result;

/// A way of turning text into sound.
///
/// The speech service holds one remote and one local backend and picks
/// between them per call.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Checks that the backend can be used. A failure here downgrades the
    /// service to the other backend for the rest of its lifetime.
    async fn prepare(&self) -> Result<()>;

    /// Speaks the utterance and resolves when playback has finished.
    ///
    /// Must stop promptly and return [`WaveeError::Cancelled`] once `cancel`
    /// fires.
    ///
    /// [`WaveeError::Cancelled`]: crate::error::WaveeError::Cancelled
    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> Result<()>;

    /// Drops cached data and any process the backend still owns.
    async fn release(&self);
}

/// Remote text-to-speech HTTP service.
#[async_trait]
pub trait TtsClient: Send + Sync {
    /// Verifies the credentials against the service.
    async fn validate(&self) -> Result<()>;

    /// Generates audio for one request.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip>;

    /// Voice used when a request does not name one.
    fn default_voice(&self) -> &str;
}

/// Audio device access: one-shot clips and a single looping track.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Plays a clip to the end, or until `cancel` fires.
    async fn play_clip(&self, clip: &AudioClip, volume: f64, cancel: CancellationToken)
    -> Result<()>;

    /// Starts looping `source` (a URL or file path), replacing any current loop.
    async fn start_loop(&self, source: &str, volume: f64) -> Result<()>;

    async fn stop_loop(&self);

    async fn set_loop_volume(&self, volume: f64) -> Result<()>;
}
