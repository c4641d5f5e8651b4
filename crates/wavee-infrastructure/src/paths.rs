//! Unified path management for Wavee files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/wavee/             # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys (0600)
//! └── logs/                    # Daily rolling logs
//!     └── wavee.log.YYYY-MM-DD
//!
//! ~/.local/share/wavee/        # Data directory
//! └── store/                   # One JSON blob per store key
//!     ├── wavee-journal-entries.json
//!     └── ...
//! ```
//!
//! Every path can be re-rooted with a base path, which tests use to stay
//! inside a temporary directory.

use std::path::{Path, PathBuf};
use thiserror::Error;

use wavee_core::config::{ElevenLabsSecret, SecretConfig};

const APP_DIR: &str = "wavee";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// The files and directories Wavee owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
    Store,
    Logs,
}

/// A resolved path, tagged with whether it names a file or a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathType {
    File(PathBuf),
    Dir(PathBuf),
}

impl PathType {
    pub fn into_path_buf(self) -> PathBuf {
        match self {
            PathType::File(p) | PathType::Dir(p) => p,
        }
    }

    pub fn as_path(&self) -> &Path {
        match self {
            PathType::File(p) | PathType::Dir(p) => p,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaveePaths {
    base: Option<PathBuf>,
}

impl WaveePaths {
    /// With `Some(base)`, config and data directories both live under `base`.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathType, PathError> {
        Ok(match service {
            ServiceType::Config => PathType::File(self.config_dir()?.join("config.toml")),
            ServiceType::Secret => PathType::File(self.config_dir()?.join("secret.json")),
            ServiceType::Logs => PathType::Dir(self.config_dir()?.join("logs")),
            ServiceType::Store => PathType::Dir(self.data_dir()?.join("store")),
        })
    }

    /// Ensures the secret file exists, creating an empty template if needed.
    ///
    /// On Unix the file is created with mode 600.
    pub fn ensure_secret_file(&self) -> std::io::Result<PathBuf> {
        let secret_path = self
            .get_path(ServiceType::Secret)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?
            .into_path_buf();

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            elevenlabs: Some(ElevenLabsSecret {
                api_key: String::new(),
            }),
        };
        let template_json = serde_json::to_string_pretty(&template).map_err(std::io::Error::other)?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&secret_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_dirs_end_with_app_name() {
        let paths = WaveePaths::new(None);
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with("wavee"));
        }
    }

    #[test]
    fn test_base_path_reroots_everything() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaveePaths::new(Some(temp_dir.path()));

        let config = paths.get_path(ServiceType::Config).unwrap();
        assert_eq!(config, PathType::File(temp_dir.path().join("config/config.toml")));

        let store = paths.get_path(ServiceType::Store).unwrap();
        assert!(matches!(store, PathType::Dir(_)));
        assert!(store.as_path().starts_with(temp_dir.path()));

        let logs = paths.get_path(ServiceType::Logs).unwrap().into_path_buf();
        assert!(logs.ends_with("logs"));
    }

    #[test]
    fn test_ensure_secret_file_writes_template() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WaveePaths::new(Some(temp_dir.path()));

        let path = paths.ensure_secret_file().unwrap();
        let secrets: SecretConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(secrets.elevenlabs_api_key().is_none());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        // A second call leaves an existing file alone.
        std::fs::write(&path, r#"{"elevenlabs":{"api_key":"sk-live"}}"#).unwrap();
        paths.ensure_secret_file().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("sk-live"));
    }
}
