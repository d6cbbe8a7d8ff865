//! Storage for presentation difficulty ratings
//!
//! The whole [`RatingBook`] is stored under `presentationRatings-{learner}`
//! and rewritten on every change.

use crate::storage::{namespaced_key, PersistencePort, Result, RATINGS_NAMESPACE};

use super::models::*;

pub struct RatingsStore<P> {
    port: P,
    key: String,
}

impl<P: PersistencePort> RatingsStore<P> {
    pub fn for_learner(port: P, learner: Option<&str>) -> Self {
        Self {
            port,
            key: namespaced_key(RATINGS_NAMESPACE, learner),
        }
    }

    /// Load the rating book. Unreadable data yields an empty book.
    pub fn load(&self) -> RatingBook {
        let content = match self.port.load(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => return RatingBook::new(),
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.key, e);
                return RatingBook::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable ratings blob {}: {}", self.key, e);
            RatingBook::new()
        })
    }

    /// Record a rating, overwriting any earlier rating for the same slot
    pub fn record(
        &self,
        demographic: Demographic,
        presentation: &str,
        category: VindicateCategory,
        difficulty: Difficulty,
    ) -> Result<()> {
        let mut book = self.load();
        book.set(demographic, presentation, category, difficulty);

        let content = serde_json::to_string(&book)?;
        self.port.save(&self.key, &content)?;
        log::debug!(
            "Rated {} ({:?}, {:?}) as {:?}",
            presentation,
            demographic,
            category,
            difficulty
        );
        Ok(())
    }

    pub fn rated_items(&self) -> Vec<RatedItem> {
        self.load().items()
    }

    pub fn items_with_difficulty(&self, difficulty: Difficulty) -> Vec<RatedItem> {
        self.rated_items()
            .into_iter()
            .filter(|item| item.difficulty == difficulty)
            .collect()
    }
}
