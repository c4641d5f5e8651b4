//! Local key-value store abstraction.
//!
//! Every piece of persisted Wavee state is a flat JSON blob stored under a
//! fixed key. The store is opaque to the rest of the workspace: there are no
//! cross-key transactions and the last writer wins.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::Result;

/// Fixed store keys.
pub mod keys {
    pub const JOURNAL_ENTRIES: &str = "wavee-journal-entries";
    pub const PANIC_SESSIONS: &str = "wavee-panic-sessions";
    pub const USAGE_STATS: &str = "wavee-usage-stats";
    pub const AUDIO_PREFERENCES: &str = "wavee-audio-preferences";
    pub const COMPLETED_LESSONS: &str = "wavee-completed-lessons";
    pub const AUTH_STATUS: &str = "wavee-auth-status";
}

/// Raw get/set of named JSON blobs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// A record type persisted under one fixed key.
pub trait StoreRecord: Serialize + DeserializeOwned + Default + Send + Sync {
    const KEY: &'static str;
}

/// Typed access to [`StoreRecord`]s on top of a [`KeyValueStore`].
///
/// Reading never fails because of bad data: an absent key yields the default
/// value and a malformed blob is logged, overwritten with the default and
/// returned as the default.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Returns the underlying raw store.
    pub fn raw(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner
    }

    /// Loads a record, substituting the default for absent or malformed data.
    pub async fn load<T: StoreRecord>(&self) -> Result<T> {
        let Some(raw) = self.inner.get(T::KEY).await? else {
            return Ok(T::default());
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    "[RecordStore] Malformed data under '{}', resetting to default: {}",
                    T::KEY,
                    e
                );
                let fallback = T::default();
                self.save(&fallback).await?;
                Ok(fallback)
            }
        }
    }

    /// Serializes and stores a record under its key.
    pub async fn save<T: StoreRecord>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.inner.set(T::KEY, json).await
    }

    /// Loads, applies `f`, saves, and returns the updated record.
    pub async fn update<T, F>(&self, f: F) -> Result<T>
    where
        T: StoreRecord,
        F: FnOnce(&mut T),
    {
        let mut value = self.load::<T>().await?;
        f(&mut value);
        self.save(&value).await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            self.values.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    impl StoreRecord for Counter {
        const KEY: &'static str = "test-counter";
    }

    #[tokio::test]
    async fn test_absent_key_yields_default() {
        let store = RecordStore::new(Arc::new(MapStore::default()));
        let counter: Counter = store.load().await.unwrap();
        assert_eq!(counter, Counter::default());
    }

    #[tokio::test]
    async fn test_malformed_data_is_reset() {
        let raw = Arc::new(MapStore::default());
        raw.set("test-counter", "{not json".to_string()).await.unwrap();

        let store = RecordStore::new(raw.clone());
        let counter: Counter = store.load().await.unwrap();
        assert_eq!(counter.count, 0);

        let persisted = raw.get("test-counter").await.unwrap().unwrap();
        assert_eq!(persisted, r#"{"count":0}"#);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let store = RecordStore::new(Arc::new(MapStore::default()));
        store.update(|c: &mut Counter| c.count += 2).await.unwrap();
        let updated = store.update(|c: &mut Counter| c.count += 3).await.unwrap();
        assert_eq!(updated.count, 5);
        assert_eq!(store.load::<Counter>().await.unwrap().count, 5);
    }

    #[tokio::test]
    async fn test_audio_preferences_round_trip_exactly() {
        use crate::preferences::AudioPreferences;

        let store = RecordStore::new(Arc::new(MapStore::default()));
        let mut written = AudioPreferences {
            speech_enabled: false,
            ambient_sound_id: "forest".to_string(),
            ..Default::default()
        };
        written.set_speech_volume(0.7000000000000001);
        written.set_ambient_volume(0.43922937957426267);

        store.save(&written).await.unwrap();
        let loaded: AudioPreferences = store.load().await.unwrap();
        assert_eq!(loaded, written);
    }
}
