use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::error::{Result, WaveeError};
use crate::store::{StoreRecord, keys};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Anxious,
}

impl Mood {
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Great => "😄",
            Self::Good => "😊",
            Self::Okay => "😐",
            Self::Low => "😔",
            Self::Anxious => "😰",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Great => "Great",
            Self::Good => "Good",
            Self::Okay => "Okay",
            Self::Low => "Low",
            Self::Anxious => "Anxious",
        }
    }
}

/// A saved journal entry. Entries are never edited after saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub mood: Mood,
    pub text: String,
}

impl JournalEntry {
    /// Validates input and builds a new entry.
    ///
    /// Both a mood and non-blank text are required.
    pub fn new(mood: Option<Mood>, text: &str, now: DateTime<Utc>) -> Result<Self> {
        let mood = mood.ok_or_else(|| WaveeError::validation("select a mood for this entry"))?;
        if text.trim().is_empty() {
            return Err(WaveeError::validation("journal entry text is empty"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            mood,
            text: text.to_string(),
        })
    }
}

/// All journal entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalEntries {
    pub entries: Vec<JournalEntry>,
}

impl StoreRecord for JournalEntries {
    const KEY: &'static str = keys::JOURNAL_ENTRIES;
}

impl JournalEntries {
    pub fn prepend(&mut self, entry: JournalEntry) {
        self.entries.insert(0, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_entry_requires_mood_and_text() {
        let now = Utc::now();
        assert!(JournalEntry::new(None, "hello", now).unwrap_err().is_validation());
        assert!(
            JournalEntry::new(Some(Mood::Good), "  \n\t", now)
                .unwrap_err()
                .is_validation()
        );
        let entry = JournalEntry::new(Some(Mood::Low), "rough day", now).unwrap();
        assert_eq!(entry.mood, Mood::Low);
        assert_eq!(entry.text, "rough day");
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let now = Utc::now();
        let mut entries = JournalEntries::default();
        entries.prepend(JournalEntry::new(Some(Mood::Okay), "first", now).unwrap());
        entries.prepend(JournalEntry::new(Some(Mood::Great), "second", now).unwrap());
        assert_eq!(entries.entries[0].text, "second");
        assert_eq!(entries.entries[1].text, "first");
    }

    #[test]
    fn test_mood_parsing() {
        assert_eq!(Mood::from_str("Anxious").unwrap(), Mood::Anxious);
        assert!(Mood::from_str("angry").is_err());
        assert_eq!(Mood::Great.to_string(), "great");
    }
}
