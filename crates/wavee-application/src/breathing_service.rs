//! Standalone breathing exercise driver.
//!
//! Wraps a [`BreathingExercise`] with a one-second ticker task, spoken phase
//! cues and usage recording when the exercise runs out.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;

use wavee_core::breathing::{BreathingExercise, BreathingPhase, BreathingState, ExerciseLength};
use wavee_core::progress::Tool;

use crate::progress_service::ProgressService;
use crate::speech_service::SpeechService;

const TICK: Duration = Duration::from_secs(1);
const EVENT_CAPACITY: usize = 256;

/// Point-in-time view of the exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseSnapshot {
    pub length: ExerciseLength,
    pub time_left: u32,
    pub state: BreathingState,
    pub scale: f64,
    pub active: bool,
    pub finished: bool,
}

impl ExerciseSnapshot {
    fn of(exercise: &BreathingExercise) -> Self {
        Self {
            length: exercise.length(),
            time_left: exercise.time_left(),
            state: exercise.state(),
            scale: exercise.scale(),
            active: exercise.is_active(),
            finished: exercise.is_finished(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseEvent {
    Tick(ExerciseSnapshot),
    PhaseChanged(BreathingPhase),
    Finished,
}

struct Inner {
    exercise: Mutex<BreathingExercise>,
    driver: Mutex<Option<CancellationToken>>,
    progress: ProgressService,
    speech: Option<Arc<SpeechService>>,
    events: broadcast::Sender<ExerciseEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Clone)]
pub struct BreathingService {
    inner: Arc<Inner>,
}

impl BreathingService {
    pub fn new(progress: ProgressService, speech: Option<Arc<SpeechService>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                exercise: Mutex::new(BreathingExercise::new(ExerciseLength::default())),
                driver: Mutex::new(None),
                progress,
                speech,
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExerciseEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> ExerciseSnapshot {
        ExerciseSnapshot::of(&lock(&self.inner.exercise))
    }

    /// Stops and switches to a new total duration.
    pub fn set_length(&self, length: ExerciseLength) {
        self.stop_driver();
        lock(&self.inner.exercise).reset(Some(length));
    }

    /// Starts or resumes ticking. Does nothing once the exercise has finished.
    pub fn start(&self) {
        let state = {
            let mut exercise = lock(&self.inner.exercise);
            exercise.start();
            if !exercise.is_active() {
                return;
            }
            exercise.state()
        };

        let cancel = {
            let mut driver = lock(&self.inner.driver);
            if driver.is_some() {
                return;
            }
            let cancel = CancellationToken::new();
            *driver = Some(cancel.clone());
            cancel
        };

        tracing::debug!("[BreathingService] Started");
        if let Some(speech) = &self.inner.speech {
            speech.cue_in_background(state.phase, state.seconds_remaining);
        }
        tokio::spawn(drive(Arc::clone(&self.inner), cancel));
    }

    /// Pauses without losing the phase or remaining time.
    pub fn pause(&self) {
        lock(&self.inner.exercise).pause();
        self.stop_driver();
    }

    pub fn toggle(&self) {
        if self.snapshot().active {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stops and restores the full duration.
    pub fn reset(&self) {
        self.stop_driver();
        lock(&self.inner.exercise).reset(None);
    }

    fn stop_driver(&self) {
        if let Some(cancel) = lock(&self.inner.driver).take() {
            cancel.cancel();
        }
    }
}

async fn drive(inner: Arc<Inner>, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let (tick, snapshot) = {
            let mut exercise = lock(&inner.exercise);
            let tick = exercise.tick();
            (tick, ExerciseSnapshot::of(&exercise))
        };
        let _ = inner.events.send(ExerciseEvent::Tick(snapshot));

        if let Some(phase) = tick.timer.phase_changed {
            let _ = inner.events.send(ExerciseEvent::PhaseChanged(phase));
            if let Some(speech) = &inner.speech {
                speech.cue_in_background(phase, phase.duration_secs());
            }
        }

        if tick.finished {
            lock(&inner.driver).take();
            if let Err(e) = inner.progress.record_use(Tool::Breathing).await {
                tracing::warn!("[BreathingService] Failed to record usage: {}", e);
            }
            tracing::info!(
                "[BreathingService] Finished {} minute exercise",
                snapshot.length
            );
            let _ = inner.events.send(ExerciseEvent::Finished);
            return;
        }
    }
}
