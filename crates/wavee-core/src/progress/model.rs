use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

use crate::store::{StoreRecord, keys};

/// A tracked tool. Serialized names match the stored usage blob.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Tool {
    PanicButton,
    Breathing,
    Visualizations,
    Journal,
    Lessons,
}

impl Tool {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PanicButton => "Panic Relief",
            Self::Breathing => "Breathing",
            Self::Visualizations => "Visualizations",
            Self::Journal => "Journal",
            Self::Lessons => "Lessons",
        }
    }
}

/// Per-tool usage counters plus the daily streak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    #[serde(default)]
    pub counts: BTreeMap<Tool, u32>,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<NaiveDate>,
}

impl StoreRecord for UsageStats {
    const KEY: &'static str = keys::USAGE_STATS;
}

impl UsageStats {
    pub fn count(&self, tool: Tool) -> u32 {
        self.counts.get(&tool).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Records one finished session of `tool` on `today`.
    ///
    /// The streak grows when the previous use was yesterday, is kept on the
    /// same day, and restarts at 1 after a gap.
    pub fn record_use(&mut self, tool: Tool, today: NaiveDate) {
        *self.counts.entry(tool).or_insert(0) += 1;

        self.streak_days = match self.last_used {
            Some(last) if last == today => self.streak_days.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.streak_days + 1,
            // Clock went backwards; keep what we have.
            Some(last) if last > today => self.streak_days.max(1),
            _ => 1,
        };
        if self.last_used.is_none_or(|last| last < today) {
            self.last_used = Some(today);
        }
    }

    /// Whole days between the last use and `today`, if there was one.
    pub fn days_since_last_use(&self, today: NaiveDate) -> Option<i64> {
        self.last_used.map(|last| (today - last).num_days().abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_record_use_counts_and_streak() {
        let mut stats = UsageStats::default();
        stats.record_use(Tool::PanicButton, day(1));
        assert_eq!(stats.count(Tool::PanicButton), 1);
        assert_eq!(stats.streak_days, 1);
        assert_eq!(stats.last_used, Some(day(1)));

        stats.record_use(Tool::Journal, day(1));
        assert_eq!(stats.streak_days, 1);

        stats.record_use(Tool::Breathing, day(2));
        stats.record_use(Tool::Breathing, day(3));
        assert_eq!(stats.streak_days, 3);

        stats.record_use(Tool::Breathing, day(6));
        assert_eq!(stats.streak_days, 1);
        assert_eq!(stats.count(Tool::Breathing), 3);
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_backwards_clock_keeps_last_used() {
        let mut stats = UsageStats::default();
        stats.record_use(Tool::Journal, day(5));
        stats.record_use(Tool::Journal, day(4));
        assert_eq!(stats.last_used, Some(day(5)));
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_serialized_tool_names() {
        let mut stats = UsageStats::default();
        stats.record_use(Tool::PanicButton, day(1));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["counts"]["panicButton"], 1);
        assert_eq!(json["lastUsed"], "2026-03-01");
        assert_eq!(stats.days_since_last_use(day(4)), Some(3));
    }
}
