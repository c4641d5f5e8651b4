//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` (created with defaults on
//! first run) and caches it for the lifetime of the service.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use wavee_core::config::RootConfig;
use wavee_core::error::{Result, WaveeError};

use crate::paths::{ServiceType, WaveePaths};
use crate::storage::AtomicFile;

#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = WaveePaths::new(base_path)
            .get_path(ServiceType::Config)
            .map_err(|e| WaveeError::config(e.to_string()))?
            .into_path_buf();
        Ok(Self::with_file(path))
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing file is created with defaults. An unreadable or invalid file
    /// is logged and defaults are used without overwriting it.
    pub fn get_config(&self) -> RootConfig {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            return cached.clone();
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!(
                "[ConfigService] Using default config, failed to load {}: {}",
                self.file.path().display(),
                e
            );
            RootConfig::default()
        });

        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Some(loaded.clone());
        loaded
    }

    /// Writes `config` to disk and refreshes the cache.
    pub fn save(&self, config: &RootConfig) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)?;
        self.file.write(&toml_string)?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn load_config(&self) -> Result<RootConfig> {
        match self.file.read()? {
            Some(content) => Ok(toml::from_str(&content)?),
            None => {
                let default_config = RootConfig::default();
                self.file.write(&toml::to_string_pretty(&default_config)?)?;
                tracing::info!(
                    "[ConfigService] Created default config at {}",
                    self.file.path().display()
                );
                Ok(default_config)
            }
        }
    }
}
