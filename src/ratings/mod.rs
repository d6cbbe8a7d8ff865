//! Per-learner difficulty ratings for studied presentations
//!
//! Ratings are keyed by population, presentation and VINDICATE category,
//! and back the "review what you found hard" lists.

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::RatingsStore;
