//! Atomic whole-file replacement with advisory locking.
//!
//! Writers go through a temporary sibling file, `fsync` it and rename it over
//! the target, all while holding an exclusive `fs2` lock on a `.lock` sibling.
//! Readers never observe a half-written file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use thiserror::Error;

use wavee_core::WaveeError;

#[derive(Debug, Error)]
pub enum AtomicFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicFileError> for WaveeError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => e.into(),
            AtomicFileError::Lock(msg) => WaveeError::io(msg),
        }
    }
}

/// A handle to one file that is always replaced as a whole.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. Missing or blank files read as `None`.
    pub fn read(&self) -> Result<Option<String>, AtomicFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Replaces the file content atomically under the file lock.
    pub fn write(&self, content: &str) -> Result<(), AtomicFileError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_unlocked(content)
    }

    /// Deletes the file under the file lock. A missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicFileError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_unlocked(&self, content: &str) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            )
        })?;
        let file_name = self.path.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no file name")
        })?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock guard; released when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicFileError::Lock(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("nested/blob.json"));

        file.write(r#"{"a":1}"#).unwrap();
        assert_eq!(file.read().unwrap().as_deref(), Some(r#"{"a":1}"#));

        file.write("[]").unwrap();
        assert_eq!(file.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_and_blank_read_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.json");
        let file = AtomicFile::new(path.clone());
        assert!(file.read().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.json");
        AtomicFile::new(path.clone()).write("{}").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".blob.json.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("blob.json"));
        file.write("{}").unwrap();
        file.remove().unwrap();
        file.remove().unwrap();
        assert!(file.read().unwrap().is_none());
    }
}
