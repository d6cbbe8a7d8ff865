//! Typed access to the progress and settings blobs
//!
//! Both blobs live under a namespaced key in a [`PersistencePort`]:
//! ```text
//! flashcardProgress[-{learner}]   { "{card-id}": { reviewDate, intervalDays, easeFactor } }
//! flashcardSettings[-{learner}]   { againMinutes, goodDays, easyDays, newCardsPerDay }
//! ```
//! Unreadable blobs are treated as absent. A progress entry that fails to
//! decode is skipped on load but kept verbatim on write. Every commit
//! rewrites the whole progress blob, so two sessions writing the same key
//! race and the last write wins.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::storage::{namespaced_key, PersistencePort, PROGRESS_NAMESPACE, SETTINGS_NAMESPACE};

use super::models::{CardProgress, ProgressMap, Settings};
use super::Result;

/// Load a key, treating read failures as absence
fn load_or_warn<P: PersistencePort>(port: &P, key: &str) -> Option<String> {
    match port.load(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            None
        }
    }
}

/// Per-card scheduling state store
pub struct ProgressStore<P> {
    port: P,
    key: String,
}

impl<P: PersistencePort> ProgressStore<P> {
    pub fn new(port: P) -> Self {
        Self::for_learner(port, None)
    }

    /// Store scoped to a learner identifier (e.g. an email address)
    pub fn for_learner(port: P, learner: Option<&str>) -> Self {
        Self {
            port,
            key: namespaced_key(PROGRESS_NAMESPACE, learner),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load every card's progress. Missing or malformed data yields an empty
    /// map; individual entries that fail to decode are skipped.
    pub fn load_all(&self) -> ProgressMap {
        self.load_entries()
            .into_iter()
            .filter_map(|(card_id, value)| match serde_json::from_value::<CardProgress>(value) {
                Ok(progress) => Some((card_id, progress)),
                Err(e) => {
                    log::warn!("Skipping unreadable progress for {} in {}: {}", card_id, self.key, e);
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, card_id: &str) -> Option<CardProgress> {
        self.load_all().get(card_id).copied()
    }

    /// Merge one card's new state into the stored map and write it back
    pub fn commit(&self, card_id: &str, progress: CardProgress) -> Result<()> {
        let mut entries = self.load_entries();
        entries.insert(card_id.to_string(), serde_json::to_value(progress)?);
        self.write(&entries)?;

        log::debug!(
            "Committed {}: interval {:.2}d, ease {:.2}, due {}",
            card_id,
            progress.interval_days,
            progress.ease_factor,
            progress.review_due_at
        );
        Ok(())
    }

    /// Drop entries for cards not in `keep`; returns how many were removed
    pub fn prune(&self, keep: &HashSet<&str>) -> Result<usize> {
        let entries = self.load_entries();
        let before = entries.len();
        let kept: Map<String, Value> = entries
            .into_iter()
            .filter(|(card_id, _)| keep.contains(card_id.as_str()))
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.write(&kept)?;
            log::info!("Pruned {} stale progress entries from {}", removed, self.key);
        }
        Ok(removed)
    }

    /// Raw card id -> entry map; anything but a JSON object counts as empty
    fn load_entries(&self) -> Map<String, Value> {
        let Some(content) = load_or_warn(&self.port, &self.key) else {
            return Map::new();
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => entries,
            Ok(_) => {
                log::warn!("Discarding progress blob {}: not a JSON object", self.key);
                Map::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable progress blob {}: {}", self.key, e);
                Map::new()
            }
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        let content = serde_json::to_string(entries)?;
        self.port.save(&self.key, &content)?;
        Ok(())
    }
}

/// Scheduler settings store
pub struct SettingsStore<P> {
    port: P,
    key: String,
}

impl<P: PersistencePort> SettingsStore<P> {
    pub fn new(port: P) -> Self {
        Self::for_learner(port, None)
    }

    pub fn for_learner(port: P, learner: Option<&str>) -> Self {
        Self {
            port,
            key: namespaced_key(SETTINGS_NAMESPACE, learner),
        }
    }

    /// Load settings, falling back to defaults. Values are always clamped.
    pub fn load(&self) -> Settings {
        let Some(content) = load_or_warn(&self.port, &self.key) else {
            return Settings::default();
        };

        match serde_json::from_str::<Settings>(&content) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Using default settings, {} is unreadable: {}", self.key, e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<Settings> {
        let settings = settings.sanitized();
        let content = serde_json::to_string(&settings)?;
        self.port.save(&self.key, &content)?;
        Ok(settings)
    }
}
