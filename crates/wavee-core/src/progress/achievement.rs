use chrono::NaiveDate;
use serde::Serialize;
use strum::IntoEnumIterator;

use super::model::{Tool, UsageStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Requirement {
    TotalUses { at_least: u32 },
    ToolUses { tool: Tool, at_least: u32 },
    Streak { at_least: u32 },
}

impl Requirement {
    pub fn is_met(&self, stats: &UsageStats) -> bool {
        match *self {
            Self::TotalUses { at_least } => stats.total() >= at_least,
            Self::ToolUses { tool, at_least } => stats.count(tool) >= at_least,
            Self::Streak { at_least } => stats.streak_days >= at_least,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: Requirement,
}

pub static ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        title: "First Steps",
        description: "Used Wavee for the first time",
        icon: "🌟",
        requirement: Requirement::TotalUses { at_least: 1 },
    },
    Achievement {
        title: "Breathing Master",
        description: "Completed 5 breathing exercises",
        icon: "🫁",
        requirement: Requirement::ToolUses {
            tool: Tool::Breathing,
            at_least: 5,
        },
    },
    Achievement {
        title: "Mindful Explorer",
        description: "Tried all visualization types",
        icon: "🧘",
        requirement: Requirement::ToolUses {
            tool: Tool::Visualizations,
            at_least: 3,
        },
    },
    Achievement {
        title: "Self-Reflector",
        description: "Made 7 journal entries",
        icon: "📖",
        requirement: Requirement::ToolUses {
            tool: Tool::Journal,
            at_least: 7,
        },
    },
    Achievement {
        title: "Streak Keeper",
        description: "Used Wavee for 3 consecutive days",
        icon: "🔥",
        requirement: Requirement::Streak { at_least: 3 },
    },
];

/// Per-tool line of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolUsage {
    pub tool: Tool,
    pub count: u32,
    /// Share of all sessions, `0.0..=1.0`.
    pub share: f64,
}

/// Everything the progress dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_sessions: u32,
    pub streak_days: u32,
    pub tools: Vec<ToolUsage>,
    pub unlocked: Vec<&'static Achievement>,
    pub next_locked: Option<&'static Achievement>,
    pub days_since_last_use: Option<i64>,
}

impl ProgressSummary {
    pub fn from_stats(stats: &UsageStats, today: NaiveDate) -> Self {
        let total = stats.total();
        let tools = Tool::iter()
            .map(|tool| {
                let count = stats.count(tool);
                ToolUsage {
                    tool,
                    count,
                    share: f64::from(count) / f64::from(total.max(1)),
                }
            })
            .collect();

        let (unlocked, locked): (Vec<_>, Vec<_>) = ACHIEVEMENTS
            .iter()
            .partition(|a| a.requirement.is_met(stats));

        Self {
            total_sessions: total,
            streak_days: stats.streak_days,
            tools,
            unlocked,
            next_locked: locked.first().copied(),
            days_since_last_use: stats.days_since_last_use(today),
        }
    }
}
