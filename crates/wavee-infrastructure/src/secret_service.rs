//! Secret service implementation.
//!
//! Loads API keys from `secret.json`, with an environment variable taking
//! precedence so keys can be injected at deploy time without touching disk.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use wavee_core::config::{ElevenLabsSecret, SecretConfig};
use wavee_core::secret::SecretService;

use crate::paths::{ServiceType, WaveePaths};
use crate::storage::AtomicFile;

/// Environment variable that overrides the ElevenLabs key from the file.
pub const ELEVENLABS_KEY_ENV: &str = "WAVEE_ELEVENLABS_API_KEY";

/// File-backed secret service with an environment override.
///
/// The loaded config is cached after the first successful read.
#[derive(Clone)]
pub struct SecretServiceImpl {
    paths: WaveePaths,
    file_path: PathBuf,
    env_var: Option<String>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service for `secret.json` under `base_path` (or the default
    /// config directory).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let paths = WaveePaths::new(base_path);
        let file_path = paths
            .get_path(ServiceType::Secret)
            .map_err(|e| anyhow::anyhow!("Failed to get secret path: {}", e))?
            .into_path_buf();

        Ok(Self {
            paths,
            file_path,
            env_var: Some(ELEVENLABS_KEY_ENV.to_string()),
            secrets: Arc::new(RwLock::new(None)),
        })
    }

    /// Replaces (or with `None`, disables) the environment override.
    pub fn with_env_override(mut self, env_var: Option<&str>) -> Self {
        self.env_var = env_var.map(str::to_string);
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_file(&self) -> Result<SecretConfig, String> {
        self.paths
            .ensure_secret_file()
            .map_err(|e| format!("Failed to create secret file: {}", e))?;

        let content = AtomicFile::new(self.file_path.clone())
            .read()
            .map_err(|e| format!("Failed to read secret file: {}", e))?;

        match content {
            Some(json) => serde_json::from_str(&json)
                // serde errors only carry positions, never the secret text
                .map_err(|e| format!("Failed to parse secret file: {}", e)),
            None => Ok(SecretConfig::default()),
        }
    }

    fn apply_env(&self, mut secrets: SecretConfig) -> SecretConfig {
        let from_env = self
            .env_var
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty());

        if let Some(api_key) = from_env {
            tracing::debug!("[SecretService] Using ElevenLabs key from environment");
            secrets.elevenlabs = Some(ElevenLabsSecret { api_key });
        }
        secrets
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let service = self.clone();
        let loaded = tokio::task::spawn_blocking(move || service.read_file())
            .await
            .map_err(|e| format!("Secret loading task failed: {}", e))??;
        let loaded = self.apply_env(loaded);

        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.file_path).await.unwrap_or(false)
    }
}
