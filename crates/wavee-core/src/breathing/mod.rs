//! Breathing timer and the standalone breathing exercise.
//!
//! Both are pure state machines advanced by an external one-second tick.

mod exercise;
mod timer;

pub use exercise::{BreathingExercise, ExerciseLength, ExerciseTick};
pub use timer::{
    BASE_SCALE, BreathingPhase, BreathingState, BreathingTimer, MAX_SCALE, TickOutcome,
};
