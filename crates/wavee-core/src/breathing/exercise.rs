use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::timer::{BreathingState, BreathingTimer, TickOutcome};

/// Selectable length of a standalone breathing exercise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum ExerciseLength {
    #[default]
    #[strum(serialize = "1")]
    OneMinute,
    #[strum(serialize = "3")]
    ThreeMinutes,
    #[strum(serialize = "5")]
    FiveMinutes,
}

impl ExerciseLength {
    pub const fn total_secs(self) -> u32 {
        match self {
            Self::OneMinute => 60,
            Self::ThreeMinutes => 180,
            Self::FiveMinutes => 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExerciseTick {
    pub timer: TickOutcome,
    /// True on the tick that used up the last second.
    pub finished: bool,
}

/// A breathing timer bounded by a total duration.
#[derive(Debug, Clone)]
pub struct BreathingExercise {
    timer: BreathingTimer,
    length: ExerciseLength,
    time_left: u32,
}

impl BreathingExercise {
    pub fn new(length: ExerciseLength) -> Self {
        Self {
            timer: BreathingTimer::new(),
            length,
            time_left: length.total_secs(),
        }
    }

    pub fn length(&self) -> ExerciseLength {
        self.length
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn state(&self) -> BreathingState {
        self.timer.state()
    }

    pub fn scale(&self) -> f64 {
        self.timer.scale()
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.time_left == 0
    }

    /// Starts or resumes. A finished exercise stays finished until reset.
    pub fn start(&mut self) {
        if !self.is_finished() {
            self.timer.start();
        }
    }

    pub fn pause(&mut self) {
        self.timer.pause();
    }

    /// Stops and restores the full duration. The length may be changed here.
    pub fn reset(&mut self, length: Option<ExerciseLength>) {
        if let Some(length) = length {
            self.length = length;
        }
        self.timer.reset();
        self.time_left = self.length.total_secs();
    }

    pub fn tick(&mut self) -> ExerciseTick {
        if !self.timer.is_active() || self.is_finished() {
            return ExerciseTick::default();
        }

        let timer = self.timer.tick();
        self.time_left -= 1;
        let finished = self.time_left == 0;
        if finished {
            self.timer.pause();
        }

        ExerciseTick { timer, finished }
    }
}
