//! Review queue construction
//!
//! Cards with progress due at or before `now` are always included. Cards
//! never graded are sampled up to the daily new-card cap. Everything else
//! is left out of the session.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::models::{Card, ProgressMap, Settings};

/// Source of queue ordering, injectable so tests can pin the order
pub trait Shuffler {
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Uniform shuffle backed by a seedable RNG
pub struct RandomShuffler {
    rng: StdRng,
}

impl RandomShuffler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomShuffler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// How a catalog splits against the progress map at a given instant
#[derive(Debug, Default)]
pub struct Partition {
    pub due: Vec<Card>,
    pub new: Vec<Card>,
    /// Cards with progress that is not yet due
    pub scheduled: usize,
}

/// Split a catalog into due, new and not-yet-due cards. Repeated ids are
/// only considered once.
pub fn partition(catalog: &[Card], progress: &ProgressMap, now: DateTime<Utc>) -> Partition {
    let mut seen = HashSet::new();
    let mut parts = Partition::default();

    for card in catalog {
        if !seen.insert(card.id.as_str()) {
            continue;
        }
        match progress.get(&card.id) {
            Some(p) if p.is_due(now) => parts.due.push(card.clone()),
            Some(_) => parts.scheduled += 1,
            None => parts.new.push(card.clone()),
        }
    }

    parts
}

/// Build the session queue: every due card plus up to `newCardsPerDay`
/// randomly chosen new cards, shuffled together.
pub fn build_queue<S: Shuffler>(
    catalog: &[Card],
    progress: &ProgressMap,
    settings: &Settings,
    now: DateTime<Utc>,
    shuffler: &mut S,
) -> Vec<Card> {
    let Partition { due, mut new, scheduled } = partition(catalog, progress, now);

    shuffler.shuffle(&mut new);
    new.truncate(settings.sanitized().new_card_limit());

    log::debug!(
        "Built queue at {}: {} due, {} new accepted, {} scheduled later",
        now,
        due.len(),
        new.len(),
        scheduled
    );

    let mut queue = due;
    queue.append(&mut new);
    shuffler.shuffle(&mut queue);
    queue
}

/// The whole catalog in random order, ignoring scheduling
pub fn shuffle_all<S: Shuffler>(catalog: &[Card], shuffler: &mut S) -> Vec<Card> {
    let mut cards = catalog.to_vec();
    shuffler.shuffle(&mut cards);
    cards
}
