//! Deck sources and catalog construction
//!
//! A catalog is derived from raw fact pairs every time it is needed. Card
//! ids depend only on the direction mode and the front term, so progress
//! recorded against a card survives rebuilds and deck reordering.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::models::{Card, CategoryFilter, DirectionMode, FactPair};
use super::{FlashcardError, Result};

/// Supplies the raw presentation/differential pairs
pub trait DeckSource {
    fn list_pairs(&self) -> Vec<FactPair>;
}

/// Deck held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticDeck {
    pairs: Vec<FactPair>,
}

impl StaticDeck {
    pub fn new(pairs: Vec<FactPair>) -> Self {
        Self { pairs }
    }
}

impl DeckSource for StaticDeck {
    fn list_pairs(&self) -> Vec<FactPair> {
        self.pairs.clone()
    }
}

/// Deck loaded from a JSON array of pairs on disk
#[derive(Debug, Clone)]
pub struct JsonDeck {
    path: PathBuf,
    pairs: Vec<FactPair>,
}

impl JsonDeck {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|source| FlashcardError::Deck {
            path: path.clone(),
            reason: source.to_string(),
        })?;
        let pairs: Vec<FactPair> = serde_json::from_str(&content).map_err(|source| FlashcardError::Deck {
            path: path.clone(),
            reason: source.to_string(),
        })?;

        log::info!("Loaded {} fact pairs from {:?}", pairs.len(), path);
        Ok(Self { path, pairs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeckSource for JsonDeck {
    fn list_pairs(&self) -> Vec<FactPair> {
        self.pairs.clone()
    }
}

/// Distinct categories in first-seen order
pub fn categories(pairs: &[FactPair]) -> Vec<String> {
    let mut seen = Vec::new();
    for pair in pairs {
        if !seen.contains(&pair.category) {
            seen.push(pair.category.clone());
        }
    }
    seen
}

/// Build the deduplicated card catalog for a direction and category filter
pub fn build_catalog(pairs: &[FactPair], mode: DirectionMode, filter: &CategoryFilter) -> Vec<Card> {
    let filtered = pairs.iter().filter(|pair| filter.matches(&pair.category));

    let mut builder = CatalogBuilder::new(mode);
    match mode {
        DirectionMode::PresentationToDifferential => {
            for pair in filtered {
                builder.add(&pair.front, &pair.back);
            }
        }
        DirectionMode::DifferentialToPresentation => {
            for pair in filtered {
                for differential in &pair.back {
                    builder.add(differential, std::slice::from_ref(&pair.front));
                }
            }
        }
    }
    builder.finish()
}

/// Accumulates back terms per front term, keeping first-seen order
struct CatalogBuilder {
    mode: DirectionMode,
    cards: Vec<Card>,
    index: HashMap<String, usize>,
}

impl CatalogBuilder {
    fn new(mode: DirectionMode) -> Self {
        Self {
            mode,
            cards: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, front: &str, back: &[String]) {
        let position = match self.index.get(front) {
            Some(&position) => position,
            None => {
                self.cards.push(Card {
                    id: card_id(self.mode, front),
                    front: front.to_string(),
                    back: Vec::new(),
                });
                self.index.insert(front.to_string(), self.cards.len() - 1);
                self.cards.len() - 1
            }
        };

        let card = &mut self.cards[position];
        for term in back {
            if !card.back.contains(term) {
                card.back.push(term.clone());
            }
        }
    }

    fn finish(self) -> Vec<Card> {
        self.cards
    }
}

/// Stable card id for a front term in the given direction
pub fn card_id(mode: DirectionMode, front: &str) -> String {
    format!("{}-{}", mode.id_prefix(), front)
}
