//! File-backed key-value store.
//!
//! Each key is stored as `{store_dir}/{key}.json`. Blocking file work runs on
//! the blocking pool so the async runtime never stalls on disk I/O.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use wavee_core::error::{Result, WaveeError};
use wavee_core::store::KeyValueStore;

use super::atomic_file::AtomicFile;
use crate::paths::{ServiceType, WaveePaths};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens the store in the default data directory.
    pub fn new() -> Result<Self> {
        let dir = WaveePaths::new(None)
            .get_path(ServiceType::Store)
            .map_err(|e| WaveeError::config(e.to_string()))?
            .into_path_buf();
        Ok(Self::with_dir(dir))
    }

    /// Opens the store in a specific directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(WaveeError::validation(format!("invalid store key '{key}'")));
        }
        Ok(AtomicFile::new(self.dir.join(format!("{key}.json"))))
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WaveeError::internal(format!("store task failed: {e}")))?
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        blocking(move || Ok(file.read()?)).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let file = self.file_for(key)?;
        tracing::debug!("[JsonFileStore] Writing {}", file.path().display());
        blocking(move || Ok(file.write(&value)?)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        blocking(move || Ok(file.remove()?)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wavee_core::journal::{JournalEntries, JournalEntry, Mood};
    use wavee_core::store::RecordStore;

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::with_dir(temp_dir.path().to_path_buf());

        assert!(store.get("wavee-usage-stats").await.unwrap().is_none());
        store
            .set("wavee-usage-stats", r#"{"streakDays":2}"#.to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("wavee-usage-stats").await.unwrap().as_deref(),
            Some(r#"{"streakDays":2}"#)
        );
        assert!(temp_dir.path().join("wavee-usage-stats.json").exists());

        store.remove("wavee-usage-stats").await.unwrap();
        assert!(store.get("wavee-usage-stats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::with_dir(temp_dir.path().to_path_buf());
        let err = store.set("../escape", "{}".to_string()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let records = RecordStore::new(std::sync::Arc::new(JsonFileStore::with_dir(dir.clone())));
        records
            .update(|entries: &mut JournalEntries| {
                entries.prepend(
                    JournalEntry::new(Some(Mood::Good), "walked outside", chrono::Utc::now())
                        .unwrap(),
                )
            })
            .await
            .unwrap();

        let reopened = RecordStore::new(std::sync::Arc::new(JsonFileStore::with_dir(dir)));
        let entries: JournalEntries = reopened.load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.entries[0].text, "walked outside");
    }

    #[tokio::test]
    async fn test_malformed_file_resets_to_default() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("wavee-journal-entries.json"), "not json").unwrap();

        let records = RecordStore::new(std::sync::Arc::new(JsonFileStore::with_dir(
            temp_dir.path().to_path_buf(),
        )));
        let entries: JournalEntries = records.load().await.unwrap();
        assert!(entries.is_empty());

        let raw = std::fs::read_to_string(temp_dir.path().join("wavee-journal-entries.json"))
            .unwrap();
        assert_eq!(raw, "[]");
    }
}
