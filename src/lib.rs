//! Spaced repetition flashcards for clinical presentations and their
//! differential diagnoses.

pub mod flashcards;
pub mod ratings;
pub mod storage;
