//! Durable key/value storage shared by the flashcard and ratings stores
//!
//! The stores own serialization; a [`PersistencePort`] only moves strings
//! in and out of whatever medium backs it.

mod file_storage;

use std::collections::HashMap;
use std::sync::Mutex;

pub use file_storage::{FileStore, Result, StorageError};

/// Namespace for the per-card scheduling state blob
pub const PROGRESS_NAMESPACE: &str = "flashcardProgress";
/// Namespace for the flashcard settings blob
pub const SETTINGS_NAMESPACE: &str = "flashcardSettings";
/// Namespace for the presentation difficulty ratings blob
pub const RATINGS_NAMESPACE: &str = "presentationRatings";

/// Key/value persistence consumed by the stores
pub trait PersistencePort {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<P: PersistencePort + ?Sized> PersistencePort for &P {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// Build the storage key for a namespace, optionally scoped to an identifier
/// such as a learner's email address.
pub fn namespaced_key(namespace: &str, identifier: Option<&str>) -> String {
    match identifier.map(str::trim) {
        Some(id) if !id.is_empty() => format!("{}-{}", namespace, id),
        _ => namespace.to_string(),
    }
}

/// In-memory persistence port
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistencePort for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
