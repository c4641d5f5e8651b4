//! Mood journal.

use std::sync::Arc;

use wavee_core::clock::Clock;
use wavee_core::error::Result;
use wavee_core::journal::{JournalEntries, JournalEntry, Mood};
use wavee_core::progress::Tool;
use wavee_core::store::RecordStore;

use crate::progress_service::ProgressService;

#[derive(Clone)]
pub struct JournalService {
    records: RecordStore,
    progress: ProgressService,
    clock: Arc<dyn Clock>,
}

impl JournalService {
    pub fn new(records: RecordStore, progress: ProgressService, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            progress,
            clock,
        }
    }

    /// Saves a new entry at the top of the journal.
    ///
    /// # Errors
    ///
    /// Returns [`WaveeError::Validation`] when `mood` is missing or `text` is
    /// blank; nothing is written in that case.
    ///
    /// [`WaveeError::Validation`]: wavee_core::error::WaveeError::Validation
    pub async fn save(&self, mood: Option<Mood>, text: &str) -> Result<JournalEntry> {
        let entry = JournalEntry::new(mood, text, self.clock.now())?;

        let saved = entry.clone();
        self.records
            .update::<JournalEntries, _>(move |entries| entries.prepend(saved))
            .await?;
        self.progress.record_use(Tool::Journal).await?;

        tracing::info!("[JournalService] Saved entry {} ({})", entry.id, entry.mood);
        Ok(entry)
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.records.load::<JournalEntries>().await?.entries)
    }
}
