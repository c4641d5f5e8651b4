//! Usage statistics, streaks and achievements.

mod achievement;
mod model;

pub use achievement::{ACHIEVEMENTS, Achievement, ProgressSummary, Requirement, ToolUsage};
pub use model::{Tool, UsageStats};
