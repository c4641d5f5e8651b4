//! Guided panic-relief flow.
//!
//! A fixed script of six steps, one of which embeds the breathing timer.
//! [`PanicSessionController`] is the pure state machine; timers, speech and
//! persistence are driven from the application layer.

mod controller;
mod model;
mod script;

pub use controller::{
    BREATHING_AUTO_START_DELAY, BREATHING_TARGET_CYCLES, PanicSessionController, Transition,
};
pub use model::{PanicSession, PanicSessionLog, SessionStatus};
pub use script::{BREATHING_STEP, PANIC_STEPS, PanicStep, StepKind};
