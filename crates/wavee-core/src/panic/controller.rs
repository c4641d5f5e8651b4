use chrono::{DateTime, Utc};
use std::time::Duration;

use super::model::{PanicSession, SessionStatus};
use super::script::{PANIC_STEPS, PanicStep, StepKind};

/// Completed breathing cycles after which the breathing step moves on by itself.
pub const BREATHING_TARGET_CYCLES: u32 = 5;

/// Delay between entering the breathing step and the timer starting.
pub const BREATHING_AUTO_START_DELAY: Duration = Duration::from_secs(2);

/// Result of a request to move the flow forward.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Moved from one step to the next.
    Advanced {
        from: usize,
        to: usize,
        /// The new step embeds the breathing timer and it should be
        /// auto-started after [`BREATHING_AUTO_START_DELAY`].
        starts_breathing: bool,
    },
    /// The last step was confirmed; the finished record is returned.
    Completed(PanicSession),
    /// Nothing happened (no session, session already over, or the trigger
    /// does not apply to the current step).
    Ignored,
}

/// Step/lifecycle state machine for one panic session.
///
/// Timestamps are passed in by the caller; the controller never reads a
/// clock and owns no timers.
#[derive(Debug, Clone, Default)]
pub struct PanicSessionController {
    session: Option<PanicSession>,
    current: usize,
    breathing_auto_advanced: bool,
}

impl PanicSessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session at step 0, discarding any previous one.
    pub fn start(&mut self, now: DateTime<Utc>) -> &PanicSession {
        self.current = 0;
        self.breathing_auto_advanced = false;
        self.session.insert(PanicSession::begin(now))
    }

    pub fn session(&self) -> Option<&PanicSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(PanicSession::is_in_progress)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The step on screen, or `None` when no session is running.
    pub fn current_step(&self) -> Option<&'static PanicStep> {
        self.is_active().then(|| &PANIC_STEPS[self.current])
    }

    pub fn step_count(&self) -> usize {
        PANIC_STEPS.len()
    }

    /// Confirms the current step and moves forward.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Transition {
        let Some(session) = self.session.as_mut().filter(|s| s.is_in_progress()) else {
            return Transition::Ignored;
        };

        let from = self.current;
        if !session.completed_steps.contains(&from) {
            session.completed_steps.push(from);
        }

        if from + 1 < PANIC_STEPS.len() {
            let to = from + 1;
            self.current = to;
            self.breathing_auto_advanced = false;
            Transition::Advanced {
                from,
                to,
                starts_breathing: PANIC_STEPS[to].kind == StepKind::Breathing,
            }
        } else {
            session.finish(SessionStatus::Completed, now);
            Transition::Completed(session.clone())
        }
    }

    /// Reports the breathing timer's cycle count.
    ///
    /// Advances once when the target is reached on the breathing step. Later
    /// reports for the same visit are ignored.
    pub fn on_breathing_cycles(&mut self, cycles: u32, now: DateTime<Utc>) -> Transition {
        let on_breathing = self
            .current_step()
            .is_some_and(|step| step.kind == StepKind::Breathing);
        if !on_breathing || cycles < BREATHING_TARGET_CYCLES || self.breathing_auto_advanced {
            return Transition::Ignored;
        }

        self.breathing_auto_advanced = true;
        self.advance(now)
    }

    /// Leaves the flow early.
    ///
    /// Returns the abandoned record, or `None` if no session was in progress.
    pub fn exit(&mut self, now: DateTime<Utc>) -> Option<PanicSession> {
        let session = self.session.as_mut().filter(|s| s.is_in_progress())?;
        session.finish(SessionStatus::Abandoned, now);
        Some(session.clone())
    }
}
