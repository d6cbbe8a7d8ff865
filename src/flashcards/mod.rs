//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - Catalog building from presentation/differential pairs, in either direction
//! - Progress and settings stores over a persistence port
//! - Review queue construction with a daily new-card cap
//! - The grading algorithm and a head-of-queue review session

pub mod algorithm;
pub mod catalog;
pub mod models;
pub mod queue;
pub mod session;
pub mod storage;

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

pub use catalog::{DeckSource, JsonDeck, StaticDeck};
pub use models::*;
pub use queue::{RandomShuffler, Shuffler};
pub use session::{FlashcardEngine, ReviewSession};
pub use storage::{ProgressStore, SettingsStore};

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load deck {path:?}: {reason}")]
    Deck { path: PathBuf, reason: String },

    #[error("Card not in catalog: {0}")]
    CardNotInCatalog(String),

    #[error("Card {actual} is not at the head of the queue (expected {expected})")]
    NotAtHeadOfQueue { expected: String, actual: String },

    #[error("Review session has no cards left")]
    SessionFinished,
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
