//! Speech and ambient audio service.
//!
//! Holds an optional remote backend and a local backend. Each utterance tries
//! the remote backend first when it was validated during
//! [`SpeechService::initialize`], and falls back to the local one for that
//! utterance only.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use wavee_core::breathing::BreathingPhase;
use wavee_core::error::{Result, WaveeError};
use wavee_core::preferences::AudioPreferences;
use wavee_core::speech::{
    AMBIENT_SOUNDS, AmbientSound, AudioClip, AudioOutput, BackendKind, SILENCE, SpeechBackend,
    SpeechOptions, SpeechOutcome, SynthesisRequest, TtsClient, Utterance, find_ambient,
};
use wavee_core::store::RecordStore;

/// Rate used for breathing cues.
pub const BREATHING_CUE_RATE: f64 = 0.8;
/// Volume multiplier used for breathing cues.
pub const BREATHING_CUE_VOLUME: f64 = 0.9;

/// Completion callback for [`SpeechService::speak_with`].
pub type SpeechCallback = Box<dyn FnOnce(SpeechOutcome) + Send + 'static>;

/// Remote text-to-speech played through an [`AudioOutput`].
///
/// Generated clips are cached by `(text, voice)` until [`release`] is called.
///
/// [`release`]: SpeechBackend::release
pub struct RemoteBackend {
    client: Arc<dyn TtsClient>,
    output: Arc<dyn AudioOutput>,
    cache: Mutex<HashMap<(String, String), AudioClip>>,
}

impl RemoteBackend {
    pub fn new(client: Arc<dyn TtsClient>, output: Arc<dyn AudioOutput>) -> Self {
        Self {
            client,
            output,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn cached_clips(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn clip_for(&self, utterance: &Utterance, cancel: &CancellationToken) -> Result<AudioClip> {
        let voice = utterance
            .options
            .voice
            .clone()
            .unwrap_or_else(|| self.client.default_voice().to_string());
        let key = (utterance.text.clone(), voice.clone());

        if let Some(clip) = self.cache.lock().await.get(&key) {
            tracing::debug!("[RemoteBackend] Cache hit for voice {}", voice);
            return Ok(clip.clone());
        }

        let request = SynthesisRequest {
            text: utterance.text.clone(),
            voice_id: Some(voice),
            speed: utterance.options.rate.unwrap_or(1.0),
        };
        let clip = tokio::select! {
            clip = self.client.synthesize(&request) => clip?,
            _ = cancel.cancelled() => return Err(WaveeError::Cancelled),
        };

        self.cache.lock().await.insert(key, clip.clone());
        Ok(clip)
    }
}

#[async_trait]
impl SpeechBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn prepare(&self) -> Result<()> {
        self.client.validate().await
    }

    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> Result<()> {
        let clip = self.clip_for(utterance, &cancel).await?;
        self.output.play_clip(&clip, utterance.volume, cancel).await
    }

    async fn release(&self) {
        self.cache.lock().await.clear();
    }
}

/// The utterance currently playing.
struct InFlight {
    id: u64,
    cancel: CancellationToken,
}

struct SpeechState {
    remote_available: bool,
    preferences: AudioPreferences,
    current: Option<InFlight>,
    ambient_playing: bool,
}

pub struct SpeechService {
    remote: Option<Arc<dyn SpeechBackend>>,
    local: Arc<dyn SpeechBackend>,
    output: Arc<dyn AudioOutput>,
    records: RecordStore,
    state: Mutex<SpeechState>,
    /// Held for the whole backend call. An interrupted utterance keeps it
    /// until its process is gone, so the next one cannot overlap it.
    playback: Mutex<()>,
    next_id: AtomicU64,
}

impl SpeechService {
    /// Creates the service.
    ///
    /// # Arguments
    ///
    /// * `remote` - Remote backend, or `None` when no API key is configured
    /// * `local` - Always-available local synthesizer
    /// * `output` - Device used for the ambient loop
    /// * `records` - Store holding [`AudioPreferences`]
    pub fn new(
        remote: Option<Arc<dyn SpeechBackend>>,
        local: Arc<dyn SpeechBackend>,
        output: Arc<dyn AudioOutput>,
        records: RecordStore,
    ) -> Self {
        Self {
            remote,
            local,
            output,
            records,
            state: Mutex::new(SpeechState {
                remote_available: false,
                preferences: AudioPreferences::default(),
                current: None,
                ambient_playing: false,
            }),
            playback: Mutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Loads preferences and validates the remote backend.
    ///
    /// A remote failure is logged and leaves the service in local-only mode.
    ///
    /// # Errors
    ///
    /// Returns an error only when the preference store cannot be read.
    pub async fn initialize(&self) -> Result<()> {
        let preferences = self.records.load::<AudioPreferences>().await?.normalized();

        let remote_available = match &self.remote {
            Some(remote) => match remote.prepare().await {
                Ok(()) => {
                    tracing::info!("[SpeechService] Remote speech enabled");
                    true
                }
                Err(e) => {
                    tracing::info!("[SpeechService] Remote speech unavailable, using local: {}", e);
                    false
                }
            },
            None => {
                tracing::debug!("[SpeechService] No remote backend configured");
                false
            }
        };

        if let Err(e) = self.local.prepare().await {
            tracing::warn!("[SpeechService] Local speech unavailable: {}", e);
        }

        let mut state = self.state.lock().await;
        state.preferences = preferences;
        state.remote_available = remote_available;
        Ok(())
    }

    pub async fn is_remote_enabled(&self) -> bool {
        self.state.lock().await.remote_available
    }

    pub async fn is_speaking(&self) -> bool {
        self.state.lock().await.current.is_some()
    }

    pub async fn preferences(&self) -> AudioPreferences {
        self.state.lock().await.preferences.clone()
    }

    pub fn ambient_sounds(&self) -> &'static [AmbientSound] {
        &AMBIENT_SOUNDS
    }

    /// Speaks `text`, cutting off whatever was playing.
    ///
    /// The previous utterance is cancelled and waited for before this one
    /// reaches a backend. Never fails: backend errors are logged and reported through the
    /// returned [`SpeechOutcome`].
    pub async fn speak(&self, text: &str, options: SpeechOptions) -> SpeechOutcome {
        let (id, cancel, utterance, remote_available) = {
            let mut state = self.state.lock().await;
            if !state.preferences.speech_enabled {
                return SpeechOutcome::Muted;
            }
            if let Some(previous) = state.current.take() {
                previous.cancel.cancel();
            }

            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let cancel = CancellationToken::new();
            state.current = Some(InFlight {
                id,
                cancel: cancel.clone(),
            });
            let utterance = Utterance::new(text, options, state.preferences.speech_volume);
            (id, cancel, utterance, state.remote_available)
        };

        let playback = self.playback.lock().await;
        let outcome = if cancel.is_cancelled() {
            SpeechOutcome::Interrupted
        } else {
            self.run(&utterance, &cancel, remote_available).await
        };
        drop(playback);

        let mut state = self.state.lock().await;
        if state.current.as_ref().is_some_and(|c| c.id == id) {
            state.current = None;
        }
        outcome
    }

    /// Speaks `text` and hands the outcome to `on_done` exactly once.
    pub async fn speak_with(&self, text: &str, options: SpeechOptions, on_done: SpeechCallback) {
        let outcome = self.speak(text, options).await;
        on_done(outcome);
    }

    async fn run(
        &self,
        utterance: &Utterance,
        cancel: &CancellationToken,
        remote_available: bool,
    ) -> SpeechOutcome {
        if let Some(remote) = self.remote.as_ref().filter(|_| remote_available) {
            match remote.speak(utterance, cancel.clone()).await {
                Ok(()) => return SpeechOutcome::Spoken(BackendKind::Remote),
                Err(WaveeError::Cancelled) => return SpeechOutcome::Interrupted,
                Err(e) => {
                    tracing::warn!("[SpeechService] Remote speech failed, falling back: {}", e);
                }
            }
        }

        if cancel.is_cancelled() {
            return SpeechOutcome::Interrupted;
        }

        match self.local.speak(utterance, cancel.clone()).await {
            Ok(()) => SpeechOutcome::Spoken(BackendKind::Local),
            Err(WaveeError::Cancelled) => SpeechOutcome::Interrupted,
            Err(e) => {
                tracing::warn!("[SpeechService] Local speech failed: {}", e);
                SpeechOutcome::Failed(e.to_string())
            }
        }
    }

    /// Speaks a breathing cue such as "Breathe in slowly... 4".
    pub async fn speak_breathing_cue(&self, phase: BreathingPhase, count: u32) -> SpeechOutcome {
        let text = format!("{} {}", phase.cue(), count);
        let options = SpeechOptions::default()
            .with_rate(BREATHING_CUE_RATE)
            .with_volume(BREATHING_CUE_VOLUME);
        self.speak(&text, options).await
    }

    /// Speaks on a background task so the caller can keep driving the UI.
    ///
    /// The next `speak` call, from anywhere, interrupts it.
    pub fn speak_in_background(
        self: &Arc<Self>,
        text: impl Into<String>,
        options: SpeechOptions,
    ) -> JoinHandle<SpeechOutcome> {
        let service = Arc::clone(self);
        let text = text.into();
        tokio::spawn(async move { service.speak(&text, options).await })
    }

    /// Background variant of [`speak_breathing_cue`](Self::speak_breathing_cue).
    pub fn cue_in_background(
        self: &Arc<Self>,
        phase: BreathingPhase,
        count: u32,
    ) -> JoinHandle<SpeechOutcome> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.speak_breathing_cue(phase, count).await })
    }

    /// Cancels the utterance in flight, if any.
    pub async fn stop_speech(&self) {
        if let Some(current) = self.state.lock().await.current.take() {
            current.cancel.cancel();
        }
    }

    /// Switches to the ambient track `id`.
    ///
    /// The previous track always stops. `silence` and unknown ids play nothing;
    /// only known ids are saved as the preferred track.
    pub async fn play_ambient(&self, id: &str) -> Result<()> {
        self.output.stop_loop().await;

        let Some(sound) = find_ambient(id) else {
            tracing::warn!("[SpeechService] Unknown ambient sound '{}'", id);
            self.state.lock().await.ambient_playing = false;
            return Ok(());
        };

        let volume = {
            let mut state = self.state.lock().await;
            state.preferences.ambient_sound_id = sound.id.to_string();
            state.ambient_playing = false;
            state.preferences.ambient_volume
        };

        if let Some(url) = sound.url {
            match self.output.start_loop(url, volume).await {
                Ok(()) => {
                    tracing::debug!("[SpeechService] Ambient sound '{}' started", sound.id);
                    self.state.lock().await.ambient_playing = true;
                }
                Err(e) => tracing::warn!("[SpeechService] Ambient sound failed: {}", e),
            }
        }

        self.persist().await
    }

    pub async fn stop_ambient(&self) {
        self.output.stop_loop().await;
        self.state.lock().await.ambient_playing = false;
    }

    pub async fn is_ambient_playing(&self) -> bool {
        self.state.lock().await.ambient_playing
    }

    /// Starts the saved ambient track unless it is `silence`.
    pub async fn resume_ambient(&self) -> Result<()> {
        let id = self.state.lock().await.preferences.ambient_sound_id.clone();
        if id == SILENCE {
            return Ok(());
        }
        self.play_ambient(&id).await
    }

    pub async fn set_speech_volume(&self, volume: f64) -> Result<()> {
        self.state.lock().await.preferences.set_speech_volume(volume);
        self.persist().await
    }

    /// Sets the ambient volume, applying it to the running loop.
    pub async fn set_ambient_volume(&self, volume: f64) -> Result<()> {
        let (volume, playing) = {
            let mut state = self.state.lock().await;
            state.preferences.set_ambient_volume(volume);
            (state.preferences.ambient_volume, state.ambient_playing)
        };

        if playing {
            if let Err(e) = self.output.set_loop_volume(volume).await {
                tracing::warn!("[SpeechService] Failed to change ambient volume: {}", e);
            }
        }
        self.persist().await
    }

    /// Turns speech on or off. Turning it off cuts the current utterance.
    pub async fn set_speech_enabled(&self, enabled: bool) -> Result<()> {
        self.state.lock().await.preferences.speech_enabled = enabled;
        if !enabled {
            self.stop_speech().await;
        }
        self.persist().await
    }

    async fn persist(&self) -> Result<()> {
        let preferences = self.state.lock().await.preferences.clone();
        self.records.save(&preferences).await
    }

    /// Stops all audio and drops cached clips.
    pub async fn dispose(&self) {
        self.stop_speech().await;
        self.stop_ambient().await;
        if let Some(remote) = &self.remote {
            remote.release().await;
        }
        self.local.release().await;
        tracing::debug!("[SpeechService] Disposed");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use wavee_core::store::KeyValueStore;
    use wavee_infrastructure::MemoryStore;

    /// Local backend that records what it spoke.
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub spoken: StdMutex<Vec<String>>,
        pub delay: Option<Duration>,
        pub fail: bool,
        /// Delay between seeing the cancellation and returning, like a
        /// synthesizer process being killed and reaped.
        pub shutdown: Option<Duration>,
        pub active: AtomicUsize,
        pub max_active: AtomicUsize,
    }

    impl RecordingBackend {
        async fn play(&self, utterance: &Utterance, cancel: CancellationToken) -> Result<()> {
            if self.fail {
                return Err(WaveeError::speech("synthesizer missing"));
            }
            if let Some(delay) = self.delay {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {
                        if let Some(shutdown) = self.shutdown {
                            tokio::time::sleep(shutdown).await;
                        }
                        return Err(WaveeError::Cancelled);
                    }
                }
            }
            self.spoken.lock().unwrap().push(utterance.text.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl SpeechBackend for RecordingBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Local
        }

        async fn prepare(&self) -> Result<()> {
            Ok(())
        }

        async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> Result<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            let result = self.play(utterance, cancel).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            result
        }

        async fn release(&self) {}
    }

    struct FakeTts {
        valid: bool,
        fail_synthesis: bool,
        calls: AtomicUsize,
    }

    impl FakeTts {
        fn new(valid: bool, fail_synthesis: bool) -> Self {
            Self {
                valid,
                fail_synthesis,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TtsClient for FakeTts {
        async fn validate(&self) -> Result<()> {
            if self.valid {
                Ok(())
            } else {
                Err(WaveeError::http(Some(401), "invalid_api_key"))
            }
        }

        async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_synthesis {
                return Err(WaveeError::http(Some(500), "server error"));
            }
            Ok(AudioClip::new(request.text.as_bytes().to_vec(), "audio/mpeg"))
        }

        fn default_voice(&self) -> &str {
            "voice-a"
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeOutput {
        pub clips: StdMutex<Vec<(Vec<u8>, f64)>>,
        pub loops: StdMutex<Vec<(String, f64)>>,
        pub stops: AtomicUsize,
    }

    #[async_trait]
    impl AudioOutput for FakeOutput {
        async fn play_clip(
            &self,
            clip: &AudioClip,
            volume: f64,
            _cancel: CancellationToken,
        ) -> Result<()> {
            self.clips
                .lock()
                .unwrap()
                .push((clip.data.to_vec(), volume));
            Ok(())
        }

        async fn start_loop(&self, source: &str, volume: f64) -> Result<()> {
            self.loops.lock().unwrap().push((source.to_string(), volume));
            Ok(())
        }

        async fn stop_loop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }

        async fn set_loop_volume(&self, volume: f64) -> Result<()> {
            let mut loops = self.loops.lock().unwrap();
            if let Some(last) = loops.last_mut() {
                last.1 = volume;
            }
            Ok(())
        }
    }

    struct Harness {
        service: Arc<SpeechService>,
        local: Arc<RecordingBackend>,
        tts: Arc<FakeTts>,
        remote: Option<Arc<RemoteBackend>>,
        output: Arc<FakeOutput>,
        store: Arc<MemoryStore>,
    }

    fn harness(tts: Option<FakeTts>, local: RecordingBackend) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let output = Arc::new(FakeOutput::default());
        let local = Arc::new(local);
        let tts = Arc::new(tts.unwrap_or_else(|| FakeTts::new(false, false)));
        let remote = Arc::new(RemoteBackend::new(tts.clone(), output.clone()));
        let has_remote = tts.valid || tts.fail_synthesis;
        let service = SpeechService::new(
            has_remote.then(|| remote.clone() as Arc<dyn SpeechBackend>),
            local.clone(),
            output.clone(),
            RecordStore::new(store.clone()),
        );
        Harness {
            service: Arc::new(service),
            local,
            tts,
            remote: has_remote.then_some(remote),
            output,
            store,
        }
    }

    #[tokio::test]
    async fn test_remote_is_used_when_validated() {
        let h = harness(Some(FakeTts::new(true, false)), RecordingBackend::default());
        h.service.initialize().await.unwrap();
        assert!(h.service.is_remote_enabled().await);

        let outcome = h.service.speak("You are safe", SpeechOptions::default()).await;
        assert_eq!(outcome, SpeechOutcome::Spoken(BackendKind::Remote));
        assert!(h.local.spoken.lock().unwrap().is_empty());

        let clips = h.output.clips.lock().unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].0, b"You are safe".to_vec());
    }

    #[tokio::test]
    async fn test_remote_clips_are_cached_by_text_and_voice() {
        let h = harness(Some(FakeTts::new(true, false)), RecordingBackend::default());
        h.service.initialize().await.unwrap();

        h.service.speak("Hello", SpeechOptions::default()).await;
        h.service.speak("Hello", SpeechOptions::default()).await;
        h.service
            .speak("Hello", SpeechOptions::default().with_voice("voice-b"))
            .await;

        assert_eq!(h.tts.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.remote.as_ref().unwrap().cached_clips().await, 2);

        h.service.dispose().await;
        assert_eq!(h.remote.as_ref().unwrap().cached_clips().await, 0);
    }

    #[tokio::test]
    async fn test_failed_validation_downgrades_to_local() {
        let h = harness(Some(FakeTts::new(false, true)), RecordingBackend::default());
        h.service.initialize().await.unwrap();
        assert!(!h.service.is_remote_enabled().await);

        let outcome = h.service.speak("Hi", SpeechOptions::default()).await;
        assert_eq!(outcome, SpeechOutcome::Spoken(BackendKind::Local));
        assert_eq!(h.tts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_once_and_callback_fires_once() {
        let h = harness(Some(FakeTts::new(true, true)), RecordingBackend::default());
        h.service.initialize().await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(StdMutex::new(None));
        let (calls_cb, seen_cb) = (calls.clone(), seen.clone());
        h.service
            .speak_with(
                "Breathe",
                SpeechOptions::default(),
                Box::new(move |outcome| {
                    calls_cb.fetch_add(1, Ordering::SeqCst);
                    *seen_cb.lock().unwrap() = Some(outcome);
                }),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen.lock().unwrap(),
            Some(SpeechOutcome::Spoken(BackendKind::Local))
        );
        assert_eq!(*h.local.spoken.lock().unwrap(), vec!["Breathe"]);
        // Still tried first on the next call.
        assert!(h.service.is_remote_enabled().await);
    }

    #[tokio::test]
    async fn test_all_backends_failing_reports_failure() {
        let h = harness(
            None,
            RecordingBackend {
                fail: true,
                ..Default::default()
            },
        );
        h.service.initialize().await.unwrap();
        let outcome = h.service.speak("Hi", SpeechOptions::default()).await;
        assert!(matches!(outcome, SpeechOutcome::Failed(_)));
        assert!(!h.service.is_speaking().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_utterance_interrupts_previous() {
        let h = harness(
            None,
            RecordingBackend {
                delay: Some(Duration::from_secs(5)),
                ..Default::default()
            },
        );
        h.service.initialize().await.unwrap();

        let first = {
            let service = h.service.clone();
            tokio::spawn(async move { service.speak("first", SpeechOptions::default()).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(h.service.is_speaking().await);

        let second = h.service.speak("second", SpeechOptions::default()).await;
        assert_eq!(first.await.unwrap(), SpeechOutcome::Interrupted);
        assert_eq!(second, SpeechOutcome::Spoken(BackendKind::Local));
        assert_eq!(*h.local.spoken.lock().unwrap(), vec!["second"]);
        assert!(!h.service.is_speaking().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupted_utterance_stops_before_next_starts() {
        let h = harness(
            None,
            RecordingBackend {
                delay: Some(Duration::from_secs(5)),
                shutdown: Some(Duration::from_millis(300)),
                ..Default::default()
            },
        );
        h.service.initialize().await.unwrap();

        let first = h.service.speak_in_background("first", SpeechOptions::default());
        tokio::time::sleep(Duration::from_secs(1)).await;
        let second = h.service.speak_in_background("second", SpeechOptions::default());
        tokio::time::sleep(Duration::from_millis(10)).await;
        let third = h.service.speak_in_background("third", SpeechOptions::default());

        assert_eq!(first.await.unwrap(), SpeechOutcome::Interrupted);
        assert_eq!(second.await.unwrap(), SpeechOutcome::Interrupted);
        assert_eq!(third.await.unwrap(), SpeechOutcome::Spoken(BackendKind::Local));
        assert_eq!(h.local.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(*h.local.spoken.lock().unwrap(), vec!["third"]);
    }

    #[tokio::test]
    async fn test_muted_speech_is_not_played() {
        let h = harness(None, RecordingBackend::default());
        h.service.initialize().await.unwrap();
        h.service.set_speech_enabled(false).await.unwrap();

        let outcome = h.service.speak("Hi", SpeechOptions::default()).await;
        assert_eq!(outcome, SpeechOutcome::Muted);
        assert!(h.local.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_breathing_cue_text() {
        let h = harness(None, RecordingBackend::default());
        h.service.initialize().await.unwrap();
        h.service
            .speak_breathing_cue(BreathingPhase::Inhale, 4)
            .await;
        assert_eq!(
            *h.local.spoken.lock().unwrap(),
            vec![format!("{} 4", BreathingPhase::Inhale.cue())]
        );
    }

    #[tokio::test]
    async fn test_ambient_switching() {
        let h = harness(None, RecordingBackend::default());
        h.service.initialize().await.unwrap();

        h.service.play_ambient("rain").await.unwrap();
        assert!(h.service.is_ambient_playing().await);
        h.service.play_ambient("silence").await.unwrap();
        assert!(!h.service.is_ambient_playing().await);
        h.service.play_ambient("nope").await.unwrap();

        assert_eq!(h.output.loops.lock().unwrap().len(), 1);
        assert_eq!(h.output.stops.load(Ordering::SeqCst), 3);
        assert_eq!(h.service.preferences().await.ambient_sound_id, "silence");
    }

    #[tokio::test]
    async fn test_ambient_volume_applies_to_running_loop() {
        let h = harness(None, RecordingBackend::default());
        h.service.initialize().await.unwrap();
        h.service.play_ambient("ocean").await.unwrap();
        h.service.set_ambient_volume(0.6).await.unwrap();

        let loops = h.output.loops.lock().unwrap();
        assert_eq!(loops.last().unwrap().1, 0.6);
    }

    #[tokio::test]
    async fn test_preferences_are_persisted_and_reloaded() {
        let h = harness(None, RecordingBackend::default());
        h.service.initialize().await.unwrap();
        h.service.set_speech_volume(1.5).await.unwrap();
        h.service.set_ambient_volume(0.43922937957426267).await.unwrap();
        h.service.set_speech_enabled(false).await.unwrap();
        let written = h.service.preferences().await;

        let raw = h.store.get(wavee_core::store::keys::AUDIO_PREFERENCES).await.unwrap();
        assert!(raw.is_some());

        let reloaded = SpeechService::new(
            None,
            h.local.clone(),
            h.output.clone(),
            RecordStore::new(h.store.clone()),
        );
        reloaded.initialize().await.unwrap();
        let prefs = reloaded.preferences().await;
        assert_eq!(prefs, written);
        assert_eq!(prefs.speech_volume, 1.0);
    }

    #[tokio::test]
    async fn test_speech_volume_scales_utterance() {
        let h = harness(Some(FakeTts::new(true, false)), RecordingBackend::default());
        h.service.initialize().await.unwrap();
        h.service.set_speech_volume(0.5).await.unwrap();
        h.service
            .speak("Hi", SpeechOptions::default().with_volume(0.5))
            .await;
        assert_eq!(h.output.clips.lock().unwrap()[0].1, 0.25);
    }
}
