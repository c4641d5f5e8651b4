//! Access to the remote voice credentials.
//!
//! The ElevenLabs key is never part of `config.toml` and never compiled in.
//! It comes from `WAVEE_ELEVENLABS_API_KEY` or from `secret.json` next to the
//! config file; without one the app speaks with the local synthesizer only.

use crate::config::SecretConfig;

/// Source of [`SecretConfig`].
///
/// Error strings returned here are shown in logs, so they must describe the
/// failure (missing file, bad JSON) without echoing any key material.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Whether a `secret.json` exists on disk (the environment is not consulted).
    async fn secret_file_exists(&self) -> bool;

    /// The ElevenLabs key, or `None` when no usable key is configured or the
    /// secrets could not be read.
    async fn elevenlabs_api_key(&self) -> Option<String> {
        match self.load_secrets().await {
            Ok(secrets) => secrets.elevenlabs_api_key().map(str::to_string),
            Err(e) => {
                tracing::debug!("[SecretService] No secrets loaded: {}", e);
                None
            }
        }
    }
}
