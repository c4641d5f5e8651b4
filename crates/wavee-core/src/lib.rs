pub mod account;
pub mod breathing;
pub mod clock;
pub mod config;
pub mod error;
pub mod journal;
pub mod lesson;
pub mod panic;
pub mod preferences;
pub mod progress;
pub mod secret;
pub mod speech;
pub mod store;
pub mod visualization;

// Re-export common error type
pub use error::{Result, WaveeError};
