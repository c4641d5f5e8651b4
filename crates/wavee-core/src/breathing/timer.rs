use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Smallest circle scale, reached at the start of an inhale.
pub const BASE_SCALE: f64 = 0.8;
/// Largest circle scale, reached at the end of an inhale and held.
pub const MAX_SCALE: f64 = 1.2;

/// One phase of the inhale / hold / exhale cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BreathingPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathingPhase {
    /// Phase length in seconds.
    pub const fn duration_secs(self) -> u32 {
        match self {
            Self::Inhale => 4,
            Self::Hold => 4,
            Self::Exhale => 6,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Inhale => Self::Hold,
            Self::Hold => Self::Exhale,
            Self::Exhale => Self::Inhale,
        }
    }

    /// Short instruction shown next to the countdown.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inhale => "Breathe In",
            Self::Hold => "Hold",
            Self::Exhale => "Breathe Out",
        }
    }

    /// Spoken cue prefix, completed with the countdown number.
    pub const fn cue(self) -> &'static str {
        match self {
            Self::Inhale => "Breathe in slowly...",
            Self::Hold => "Hold your breath...",
            Self::Exhale => "Breathe out gently...",
        }
    }
}

/// Snapshot of the breathing countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingState {
    pub phase: BreathingPhase,
    /// Always within `1..=phase.duration_secs()`.
    pub seconds_remaining: u32,
    pub cycles_completed: u32,
}

impl Default for BreathingState {
    fn default() -> Self {
        Self {
            phase: BreathingPhase::Inhale,
            seconds_remaining: BreathingPhase::Inhale.duration_secs(),
            cycles_completed: 0,
        }
    }
}

/// What a single tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Set when the tick moved into a new phase.
    pub phase_changed: Option<BreathingPhase>,
    /// True when an exhale ran out and the cycle counter was incremented.
    pub cycle_completed: bool,
}

/// Three-phase repeating countdown.
///
/// The timer owns no clock: a driver calls [`tick`](Self::tick) once per
/// second while the timer is active. Ticks on a paused timer are ignored.
#[derive(Debug, Clone, Default)]
pub struct BreathingTimer {
    state: BreathingState,
    active: bool,
}

impl BreathingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BreathingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the timer active. Phase and cycle count are kept.
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Marks the timer inactive. Phase and cycle count are kept.
    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Stops the timer and returns to inhale with zero cycles.
    pub fn reset(&mut self) {
        self.active = false;
        self.state = BreathingState::default();
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::default();
        }

        if self.state.seconds_remaining > 1 {
            self.state.seconds_remaining -= 1;
            return TickOutcome::default();
        }

        let previous = self.state.phase;
        let next = previous.next();
        let cycle_completed = previous == BreathingPhase::Exhale;

        self.state.phase = next;
        self.state.seconds_remaining = next.duration_secs();
        if cycle_completed {
            self.state.cycles_completed += 1;
        }

        TickOutcome {
            phase_changed: Some(next),
            cycle_completed,
        }
    }

    /// Circle scale for the current second.
    ///
    /// Grows linearly from [`BASE_SCALE`] to [`MAX_SCALE`] across the inhale,
    /// stays at the maximum while holding, and shrinks back across the exhale.
    pub fn scale(&self) -> f64 {
        let phase = self.state.phase;
        let elapsed =
            1.0 - f64::from(self.state.seconds_remaining) / f64::from(phase.duration_secs());
        match phase {
            BreathingPhase::Inhale => BASE_SCALE + (MAX_SCALE - BASE_SCALE) * elapsed,
            BreathingPhase::Hold => MAX_SCALE,
            BreathingPhase::Exhale => MAX_SCALE - (MAX_SCALE - BASE_SCALE) * elapsed,
        }
    }
}
