//! Mood journal domain models.

mod model;

pub use model::{JournalEntries, JournalEntry, Mood};
