//! Engine facade and review session tracking
//!
//! [`FlashcardEngine`] ties a deck source to a progress store and exposes
//! catalog building, queue building, grading and unscheduled shuffling.
//! [`ReviewSession`] walks one built queue front to back and refuses
//! grades for anything but the card currently shown.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::storage::PersistencePort;

use super::algorithm::calculate_next_review;
use super::catalog::{build_catalog, DeckSource};
use super::models::{Card, CardProgress, CategoryFilter, DirectionMode, Grade, Settings};
use super::queue::{build_queue, shuffle_all, Shuffler};
use super::storage::ProgressStore;
use super::{FlashcardError, Result};

pub struct FlashcardEngine<D, P> {
    deck: D,
    progress: ProgressStore<P>,
}

impl<D: DeckSource, P: PersistencePort> FlashcardEngine<D, P> {
    pub fn new(deck: D, progress: ProgressStore<P>) -> Self {
        Self { deck, progress }
    }

    pub fn deck(&self) -> &D {
        &self.deck
    }

    pub fn progress(&self) -> &ProgressStore<P> {
        &self.progress
    }

    pub fn build_catalog(&self, mode: DirectionMode, filter: &CategoryFilter) -> Vec<Card> {
        build_catalog(&self.deck.list_pairs(), mode, filter)
    }

    /// Build today's queue from a single snapshot of stored progress
    pub fn build_queue<S: Shuffler>(
        &self,
        catalog: &[Card],
        settings: &Settings,
        now: DateTime<Utc>,
        shuffler: &mut S,
    ) -> Vec<Card> {
        let progress = self.progress.load_all();
        build_queue(catalog, &progress, settings, now, shuffler)
    }

    /// Grade a card from `catalog`, persist and return its new state
    pub fn grade(
        &self,
        catalog: &[Card],
        card_id: &str,
        grade: Grade,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<CardProgress> {
        if !catalog.iter().any(|card| card.id == card_id) {
            return Err(FlashcardError::CardNotInCatalog(card_id.to_string()));
        }

        let current = self.progress.get(card_id);
        let next = calculate_next_review(current.as_ref(), grade, settings, now);
        self.progress.commit(card_id, next)?;

        log::info!(
            "Graded {} as {}: next review in {:.2} days",
            card_id,
            grade,
            next.interval_days
        );
        Ok(next)
    }

    pub fn shuffle_all<S: Shuffler>(&self, catalog: &[Card], shuffler: &mut S) -> Vec<Card> {
        shuffle_all(catalog, shuffler)
    }

    /// Remove stored progress for cards that are not in `catalog`
    pub fn prune(&self, catalog: &[Card]) -> Result<usize> {
        let keep: HashSet<&str> = catalog.iter().map(|card| card.id.as_str()).collect();
        self.progress.prune(&keep)
    }
}

/// One pass over a built queue
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    queue: Vec<Card>,
    position: usize,
}

impl ReviewSession {
    pub fn new(queue: Vec<Card>) -> Self {
        Self { queue, position: 0 }
    }

    /// Card at the head of the queue
    pub fn current(&self) -> Option<&Card> {
        self.queue.get(self.position)
    }

    /// True once every card has been graded, or when nothing was due
    pub fn is_finished(&self) -> bool {
        self.position >= self.queue.len()
    }

    pub fn reviewed(&self) -> usize {
        self.position.min(self.queue.len())
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.reviewed()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Grade the head card and advance. Grading any other card is an error.
    pub fn grade<D: DeckSource, P: PersistencePort>(
        &mut self,
        engine: &FlashcardEngine<D, P>,
        card_id: &str,
        grade: Grade,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<CardProgress> {
        let head = self.current().ok_or(FlashcardError::SessionFinished)?;
        if head.id != card_id {
            return Err(FlashcardError::NotAtHeadOfQueue {
                expected: head.id.clone(),
                actual: card_id.to_string(),
            });
        }

        let progress = engine.grade(std::slice::from_ref(head), card_id, grade, settings, now)?;
        self.position += 1;
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::catalog::StaticDeck;
    use crate::flashcards::models::FactPair;
    use crate::flashcards::queue::RandomShuffler;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    const EPSILON: f64 = 1e-9;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn settings() -> Settings {
        Settings {
            again_minutes: 10,
            good_days: 1,
            easy_days: 4,
            new_cards_per_day: 20,
        }
    }

    fn engine(port: &MemoryStore) -> FlashcardEngine<StaticDeck, &MemoryStore> {
        let deck = StaticDeck::new(vec![
            FactPair::new("Chest pain", &["Myocardial infarction", "Pulmonary embolism"], "Cardiovascular"),
            FactPair::new("Dyspnea", &["Pulmonary embolism", "Asthma"], "Respiratory"),
            FactPair::new("Syncope", &["Arrhythmia"], "Cardiovascular"),
            FactPair::new("Hemoptysis", &["Tuberculosis", "Pulmonary embolism"], "Respiratory"),
            FactPair::new("Palpitations", &["Arrhythmia", "Thyrotoxicosis"], "Cardiovascular"),
        ]);
        FlashcardEngine::new(deck, ProgressStore::new(port))
    }

    #[test]
    fn test_new_card_easy_scenario() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::All);

        let result = engine.grade(&catalog, "p-Chest pain", Grade::Easy, &settings(), now()).unwrap();
        assert!((result.interval_days - 4.0).abs() < EPSILON);
        assert!((result.ease_factor - 2.65).abs() < EPSILON);
        assert_eq!(result.review_due_at, now() + Duration::days(4));
        assert_eq!(engine.progress().get("p-Chest pain"), Some(result));
    }

    #[test]
    fn test_graduated_good_then_again() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::All);
        engine
            .progress()
            .commit(
                "p-Dyspnea",
                CardProgress {
                    review_due_at: now(),
                    interval_days: 4.0,
                    ease_factor: 2.5,
                },
            )
            .unwrap();

        let good = engine.grade(&catalog, "p-Dyspnea", Grade::Good, &settings(), now()).unwrap();
        assert!((good.interval_days - 10.0).abs() < EPSILON);
        assert!((good.ease_factor - 2.5).abs() < EPSILON);

        let again = engine.grade(&catalog, "p-Dyspnea", Grade::Again, &settings(), now()).unwrap();
        assert_eq!(again.interval_days, 0.0);
        assert!((again.ease_factor - 2.3).abs() < EPSILON);
        assert_eq!(again.review_due_at, now() + Duration::minutes(10));
    }

    #[test]
    fn test_grading_unknown_card_fails() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::DifferentialToPresentation, &CategoryFilter::All);

        let err = engine.grade(&catalog, "p-Chest pain", Grade::Good, &settings(), now()).unwrap_err();
        assert!(matches!(err, FlashcardError::CardNotInCatalog(id) if id == "p-Chest pain"));
        assert!(engine.progress().load_all().is_empty());
    }

    #[test]
    fn test_queue_caps_new_cards() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::All);
        assert_eq!(catalog.len(), 5);

        let settings = Settings {
            new_cards_per_day: 2,
            ..settings()
        };
        let queue = engine.build_queue(&catalog, &settings, now(), &mut RandomShuffler::seeded(9));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_session_walks_queue_and_reschedules() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::from("Respiratory"));
        let queue = engine.build_queue(&catalog, &settings(), now(), &mut RandomShuffler::seeded(5));

        let mut session = ReviewSession::new(queue);
        assert_eq!(session.len(), 2);

        while let Some(card) = session.current() {
            let id = card.id.clone();
            session.grade(&engine, &id, Grade::Good, &settings(), now()).unwrap();
        }
        assert!(session.is_finished());
        assert_eq!(session.reviewed(), 2);
        assert_eq!(session.remaining(), 0);

        // Nothing is due again until tomorrow
        let later = engine.build_queue(&catalog, &settings(), now() + Duration::hours(1), &mut RandomShuffler::seeded(5));
        assert!(later.is_empty());
        let tomorrow = engine.build_queue(&catalog, &settings(), now() + Duration::days(1), &mut RandomShuffler::seeded(5));
        assert_eq!(tomorrow.len(), 2);
    }

    #[test]
    fn test_session_rejects_card_not_at_head() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::All);
        let mut session = ReviewSession::new(catalog[..2].to_vec());

        let err = session
            .grade(&engine, "p-Dyspnea", Grade::Easy, &settings(), now())
            .unwrap_err();
        assert!(matches!(
            err,
            FlashcardError::NotAtHeadOfQueue { ref expected, ref actual }
                if expected == "p-Chest pain" && actual == "p-Dyspnea"
        ));
        assert_eq!(session.reviewed(), 0);
        assert!(engine.progress().get("p-Dyspnea").is_none());
    }

    #[test]
    fn test_empty_session_is_finished() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let mut session = ReviewSession::new(Vec::new());

        assert!(session.is_empty());
        assert!(session.is_finished());
        assert!(session.current().is_none());
        let err = session
            .grade(&engine, "p-Chest pain", Grade::Good, &settings(), now())
            .unwrap_err();
        assert!(matches!(err, FlashcardError::SessionFinished));
    }

    #[test]
    fn test_prune_drops_cards_missing_from_catalog() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::All);
        engine.grade(&catalog, "p-Syncope", Grade::Good, &settings(), now()).unwrap();
        engine
            .progress()
            .commit("p-Retired card", CardProgress::seed(now()))
            .unwrap();

        assert_eq!(engine.prune(&catalog).unwrap(), 1);
        assert!(engine.progress().get("p-Syncope").is_some());
    }

    #[test]
    fn test_shuffle_all_ignores_schedule() {
        let port = MemoryStore::new();
        let engine = engine(&port);
        let catalog = engine.build_catalog(DirectionMode::DifferentialToPresentation, &CategoryFilter::All);
        for card in &catalog {
            engine.grade(&catalog, &card.id, Grade::Easy, &settings(), now()).unwrap();
        }

        assert!(engine.build_queue(&catalog, &settings(), now(), &mut RandomShuffler::seeded(2)).is_empty());
        let practice = engine.shuffle_all(&catalog, &mut RandomShuffler::seeded(2));
        assert_eq!(practice.len(), catalog.len());
    }
}
