//! Async driver for the guided panic-relief flow.
//!
//! [`PanicSessionController`] decides what happens; this service supplies the
//! clock, runs the breathing timer on the breathing step, narrates steps,
//! persists finished sessions and broadcasts [`PanicEvent`]s to the front end.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{Instant, interval_at, sleep};
use tokio_util::sync::CancellationToken;

use wavee_core::breathing::{BreathingState, BreathingTimer};
use wavee_core::clock::Clock;
use wavee_core::error::Result;
use wavee_core::panic::{
    BREATHING_AUTO_START_DELAY, PANIC_STEPS, PanicSession, PanicSessionController,
    PanicSessionLog, PanicStep, SessionStatus, Transition,
};
use wavee_core::progress::Tool;
use wavee_core::speech::SpeechOptions;
use wavee_core::store::RecordStore;

use crate::progress_service::ProgressService;
use crate::speech_service::SpeechService;

const TICK: Duration = Duration::from_secs(1);
const EVENT_CAPACITY: usize = 256;
const NARRATION_RATE: f64 = 0.85;

#[derive(Debug, Clone, PartialEq)]
pub enum PanicEvent {
    Started {
        session_id: String,
    },
    StepChanged {
        index: usize,
        step: &'static PanicStep,
    },
    /// The breathing timer began ticking on the breathing step.
    BreathingStarted,
    BreathingTick {
        state: BreathingState,
        scale: f64,
    },
    Completed(PanicSession),
    Exited(PanicSession),
}

struct Inner {
    controller: Mutex<PanicSessionController>,
    timer: Mutex<BreathingTimer>,
    breathing: Mutex<Option<CancellationToken>>,
    records: RecordStore,
    progress: ProgressService,
    speech: Option<Arc<SpeechService>>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<PanicEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Clone)]
pub struct PanicSessionService {
    inner: Arc<Inner>,
}

impl PanicSessionService {
    pub fn new(
        records: RecordStore,
        progress: ProgressService,
        speech: Option<Arc<SpeechService>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                controller: Mutex::new(PanicSessionController::new()),
                timer: Mutex::new(BreathingTimer::new()),
                breathing: Mutex::new(None),
                records,
                progress,
                speech,
                clock,
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanicEvent> {
        self.inner.events.subscribe()
    }

    /// Begins a new session at the first step.
    ///
    /// A session already in progress is replaced without being recorded.
    pub fn start(&self) -> PanicSession {
        self.inner.cancel_breathing();
        let session = lock(&self.inner.controller)
            .start(self.inner.clock.now())
            .clone();

        tracing::info!("[PanicSessionService] Session {} started", session.id);
        self.inner.emit(PanicEvent::Started {
            session_id: session.id.clone(),
        });
        self.inner.enter_step(0);
        session
    }

    /// Confirms the current step.
    ///
    /// # Errors
    ///
    /// Returns an error only when a completed session cannot be persisted.
    pub async fn advance(&self) -> Result<Transition> {
        let transition = lock(&self.inner.controller).advance(self.inner.clock.now());
        self.inner.apply(&transition).await?;
        Ok(transition)
    }

    /// Leaves the flow early, recording an abandoned session.
    ///
    /// Returns `None` when no session was in progress.
    pub async fn exit(&self) -> Result<Option<PanicSession>> {
        let Some(session) = lock(&self.inner.controller).exit(self.inner.clock.now()) else {
            return Ok(None);
        };

        self.inner.cancel_breathing();
        if let Some(speech) = &self.inner.speech {
            speech.stop_speech().await;
        }

        self.inner.record(session.clone()).await?;
        tracing::info!(
            "[PanicSessionService] Session {} abandoned after {} step(s)",
            session.id,
            session.completed_steps.len()
        );
        self.inner.emit(PanicEvent::Exited(session.clone()));
        Ok(Some(session))
    }

    pub fn is_active(&self) -> bool {
        lock(&self.inner.controller).is_active()
    }

    /// Index and content of the step on screen.
    pub fn current_step(&self) -> Option<(usize, &'static PanicStep)> {
        let controller = lock(&self.inner.controller);
        controller
            .current_step()
            .map(|step| (controller.current_index(), step))
    }

    pub fn step_count(&self) -> usize {
        PANIC_STEPS.len()
    }

    pub fn breathing_state(&self) -> (BreathingState, f64) {
        let timer = lock(&self.inner.timer);
        (timer.state(), timer.scale())
    }

    pub fn is_breathing(&self) -> bool {
        lock(&self.inner.timer).is_active()
    }

    /// Pauses or resumes the breathing timer while it is running.
    pub fn toggle_breathing(&self) {
        if lock(&self.inner.breathing).is_none() {
            return;
        }
        let mut timer = lock(&self.inner.timer);
        if timer.is_active() {
            timer.pause();
        } else {
            timer.start();
        }
    }

    pub async fn history(&self) -> Result<PanicSessionLog> {
        self.inner.records.load().await
    }
}

impl Inner {
    fn emit(&self, event: PanicEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn enter_step(self: &Arc<Self>, index: usize) {
        let step = &PANIC_STEPS[index];
        tracing::debug!("[PanicSessionService] Step {}: {}", index, step.title);
        self.emit(PanicEvent::StepChanged { index, step });

        if let Some(speech) = &self.speech {
            speech.speak_in_background(
                step.spoken,
                SpeechOptions::default().with_rate(NARRATION_RATE),
            );
        }
    }

    async fn apply(self: &Arc<Self>, transition: &Transition) -> Result<()> {
        match transition {
            Transition::Advanced {
                to,
                starts_breathing,
                ..
            } => {
                self.cancel_breathing();
                self.enter_step(*to);
                if *starts_breathing {
                    self.schedule_breathing();
                }
            }
            Transition::Completed(session) => {
                self.cancel_breathing();
                self.record(session.clone()).await?;
                tracing::info!(
                    "[PanicSessionService] Session {} completed in {} ms",
                    session.id,
                    session.duration_ms
                );
                self.emit(PanicEvent::Completed(session.clone()));
            }
            Transition::Ignored => {}
        }
        Ok(())
    }

    /// Appends a finished session to the log; completions also count as a
    /// panic-button use.
    async fn record(&self, session: PanicSession) -> Result<()> {
        let completed = session.status == SessionStatus::Completed;
        self.records
            .update::<PanicSessionLog, _>(move |log| log.append(session))
            .await?;
        if completed {
            self.progress.record_use(Tool::PanicButton).await?;
        }
        Ok(())
    }

    fn schedule_breathing(self: &Arc<Self>) {
        let cancel = CancellationToken::new();
        if let Some(previous) = lock(&self.breathing).replace(cancel.clone()) {
            previous.cancel();
        }
        lock(&self.timer).reset();
        tokio::spawn(run_breathing(Arc::clone(self), cancel));
    }

    fn cancel_breathing(&self) {
        if let Some(cancel) = lock(&self.breathing).take() {
            cancel.cancel();
        }
        lock(&self.timer).reset();
    }
}

async fn run_breathing(inner: Arc<Inner>, cancel: CancellationToken) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = sleep(BREATHING_AUTO_START_DELAY) => {}
    }

    lock(&inner.timer).start();
    inner.emit(PanicEvent::BreathingStarted);

    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let (outcome, state, scale) = {
            let mut timer = lock(&inner.timer);
            if !timer.is_active() {
                continue;
            }
            let outcome = timer.tick();
            (outcome, timer.state(), timer.scale())
        };
        inner.emit(PanicEvent::BreathingTick { state, scale });

        if outcome.cycle_completed {
            let transition =
                lock(&inner.controller).on_breathing_cycles(state.cycles_completed, inner.clock.now());
            if transition != Transition::Ignored {
                tracing::debug!(
                    "[PanicSessionService] {} breathing cycles done, moving on",
                    state.cycles_completed
                );
                if let Err(e) = inner.apply(&transition).await {
                    tracing::warn!("[PanicSessionService] Failed to apply transition: {}", e);
                }
                return;
            }
        }

        if let (Some(phase), Some(speech)) = (outcome.phase_changed, &inner.speech) {
            speech.cue_in_background(phase, phase.duration_secs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress_service::tests::FixedClock;
    use wavee_core::panic::{BREATHING_STEP, BREATHING_TARGET_CYCLES};
    use wavee_infrastructure::MemoryStore;

    struct Harness {
        service: PanicSessionService,
        progress: ProgressService,
        clock: Arc<FixedClock>,
    }

    fn harness() -> Harness {
        let clock = Arc::new(FixedClock::new());
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        let progress = ProgressService::new(records.clone(), clock.clone());
        Harness {
            service: PanicSessionService::new(records, progress.clone(), None, clock.clone()),
            progress,
            clock,
        }
    }

    fn drain(events: &mut broadcast::Receiver<PanicEvent>) -> Vec<PanicEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    fn seconds_until_auto_advance() -> u64 {
        let cycle: u64 = 4 + 4 + 6;
        BREATHING_AUTO_START_DELAY.as_secs() + cycle * u64::from(BREATHING_TARGET_CYCLES)
    }

    #[tokio::test(start_paused = true)]
    async fn test_breathing_step_auto_advances_once() {
        let h = harness();
        let mut events = h.service.subscribe();
        h.service.start();

        let transition = h.service.advance().await.unwrap();
        assert!(matches!(
            transition,
            Transition::Advanced {
                to: BREATHING_STEP,
                starts_breathing: true,
                ..
            }
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!h.service.is_breathing());

        tokio::time::sleep(Duration::from_secs(seconds_until_auto_advance())).await;
        assert_eq!(h.service.current_step().unwrap().0, BREATHING_STEP + 1);
        assert!(!h.service.is_breathing());

        let events = drain(&mut events);
        let steps: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                PanicEvent::StepChanged { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![0, 1, 2]);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, PanicEvent::BreathingStarted))
                .count(),
            1
        );

        // Nothing else is scheduled after the auto-advance.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(h.service.current_step().unwrap().0, BREATHING_STEP + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_advance_cancels_breathing() {
        let h = harness();
        h.service.start();
        h.service.advance().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(h.service.is_breathing());

        h.service.advance().await.unwrap();
        assert!(!h.service.is_breathing());
        tokio::time::sleep(Duration::from_secs(200)).await;
        assert_eq!(h.service.current_step().unwrap().0, BREATHING_STEP + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_breathing_does_not_advance() {
        let h = harness();
        h.service.start();
        h.service.advance().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        h.service.toggle_breathing();
        let (paused, _) = h.service.breathing_state();
        tokio::time::sleep(Duration::from_secs(200)).await;
        assert_eq!(h.service.breathing_state().0, paused);
        assert_eq!(h.service.current_step().unwrap().0, BREATHING_STEP);

        h.service.toggle_breathing();
        assert!(h.service.is_breathing());
    }

    #[tokio::test]
    async fn test_completion_is_recorded_once() {
        let h = harness();
        let mut events = h.service.subscribe();
        h.service.start();
        h.clock.advance_secs(90);

        let mut completed = None;
        for _ in 0..h.service.step_count() {
            if let Transition::Completed(session) = h.service.advance().await.unwrap() {
                completed = Some(session);
            }
        }
        let session = completed.unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.duration_ms, 90_000);
        assert_eq!(session.completed_steps, vec![0, 1, 2, 3, 4, 5]);

        assert_eq!(h.service.advance().await.unwrap(), Transition::Ignored);
        assert!(!h.service.is_active());

        let stats = h.progress.stats().await.unwrap();
        assert_eq!(stats.count(Tool::PanicButton), 1);
        assert_eq!(stats.last_used, Some(h.clock.today()));

        let history = h.service.history().await.unwrap();
        assert_eq!(history.sessions.len(), 1);
        assert_eq!(history.completed_count(), 1);
        assert!(
            drain(&mut events)
                .iter()
                .any(|e| matches!(e, PanicEvent::Completed(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_records_abandoned_session() {
        let h = harness();
        h.service.start();
        h.service.advance().await.unwrap();

        let session = h.service.exit().await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Abandoned);
        assert_eq!(session.completed_steps, vec![0]);
        assert!(h.service.exit().await.unwrap().is_none());

        tokio::time::sleep(Duration::from_secs(200)).await;
        assert!(!h.service.is_breathing());
        assert!(h.service.current_step().is_none());

        let history = h.service.history().await.unwrap();
        assert_eq!(history.sessions.len(), 1);
        assert_eq!(history.completed_count(), 0);
        assert_eq!(h.progress.stats().await.unwrap().total(), 0);
    }
}
