use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PersistencePort;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence port backed by a directory with one JSON file per key
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("ddx-flashcards"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Create the backing directory if it doesn't exist
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_name_for_key(key)))
    }
}

impl PersistencePort for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        Ok(Some(content))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.init()?;
        let path = self.key_path(key);
        fs::write(&path, value)?;
        log::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

/// Map an arbitrary key (which may embed an email address) to a file stem.
/// Percent-encoding keeps distinct keys in distinct files.
fn file_name_for_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}
