use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use ddx_lib::flashcards::{
    Card, CategoryFilter, DirectionMode, FlashcardEngine, JsonDeck, ProgressStore, Settings, SettingsStore,
};
use ddx_lib::ratings::RatingsStore;
use ddx_lib::storage::FileStore;

use crate::DeckArgs;

/// Environment variable overriding the default data directory
const DATA_DIR_ENV: &str = "DDX_DATA_DIR";

/// Optional `config.toml` in the data directory
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    pub learner: Option<String>,
    pub deck: Option<PathBuf>,
}

impl CliConfig {
    fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }
}

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub learner: Option<String>,
    pub deck_path: PathBuf,
}

impl App {
    pub fn new(data_dir: Option<PathBuf>, learner: Option<String>, deck: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from)) {
            Some(dir) => dir,
            None => FileStore::default_data_dir().context("Failed to get data directory")?,
        };

        let config = CliConfig::load(&data_dir)?;
        let learner = learner.or(config.learner);
        let deck_path = deck
            .or(config.deck)
            .unwrap_or_else(|| data_dir.join("deck.json"));

        log::debug!("Using data directory {:?}, deck {:?}", data_dir, deck_path);

        Ok(Self {
            data_dir,
            learner,
            deck_path,
        })
    }

    fn store(&self) -> FileStore {
        FileStore::new(self.data_dir.clone())
    }

    pub fn engine(&self) -> Result<FlashcardEngine<JsonDeck, FileStore>> {
        let deck = JsonDeck::open(&self.deck_path)
            .with_context(|| format!("Failed to open deck {:?} (pass --deck or set deck in config.toml)", self.deck_path))?;
        Ok(FlashcardEngine::new(deck, self.progress()))
    }

    pub fn progress(&self) -> ProgressStore<FileStore> {
        ProgressStore::for_learner(self.store(), self.learner.as_deref())
    }

    pub fn settings_store(&self) -> SettingsStore<FileStore> {
        SettingsStore::for_learner(self.store(), self.learner.as_deref())
    }

    pub fn settings(&self) -> Settings {
        self.settings_store().load()
    }

    pub fn ratings(&self) -> RatingsStore<FileStore> {
        RatingsStore::for_learner(self.store(), self.learner.as_deref())
    }

    /// Build the catalog selected by the deck arguments
    pub fn catalog(&self, engine: &FlashcardEngine<JsonDeck, FileStore>, args: &DeckArgs) -> Vec<Card> {
        engine.build_catalog(args.mode, &CategoryFilter::from(args.category.as_str()))
    }

    /// Every card of both directions, unfiltered
    pub fn full_catalog(&self, engine: &FlashcardEngine<JsonDeck, FileStore>) -> Vec<Card> {
        let mut cards = engine.build_catalog(DirectionMode::PresentationToDifferential, &CategoryFilter::All);
        cards.extend(engine.build_catalog(DirectionMode::DifferentialToPresentation, &CategoryFilter::All));
        cards
    }

    /// Look up a card of either direction by id
    pub fn find_card(&self, engine: &FlashcardEngine<JsonDeck, FileStore>, card_id: &str) -> Result<Card> {
        match self.full_catalog(engine).into_iter().find(|card| card.id == card_id) {
            Some(card) => Ok(card),
            None => bail!("Card '{}' is not in the deck {:?}", card_id, self.deck_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let deck_path = temp_dir.path().join("deck.json");
        fs::write(
            &deck_path,
            r#"[{"presentation": "Chest pain", "differentials": ["Angina", "Pericarditis"], "system": "Cardiovascular"}]"#,
        )
        .unwrap();

        let app = App::new(Some(temp_dir.path().to_path_buf()), None, Some(deck_path)).unwrap();
        (app, temp_dir)
    }

    #[test]
    fn test_find_card_in_either_direction() {
        let (app, _temp) = create_test_app();
        let engine = app.engine().unwrap();

        assert_eq!(app.find_card(&engine, "p-Chest pain").unwrap().back, vec!["Angina", "Pericarditis"]);
        assert_eq!(app.find_card(&engine, "d-Angina").unwrap().back, vec!["Chest pain"]);
    }

    #[test]
    fn test_find_card_rejects_unknown_id() {
        let (app, _temp) = create_test_app();
        let engine = app.engine().unwrap();

        let err = app.find_card(&engine, "p-Chest pian").unwrap_err();
        assert!(err.to_string().contains("p-Chest pian"));
    }

    #[test]
    fn test_config_supplies_learner() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "learner = \"sam@example.com\"\n").unwrap();

        let app = App::new(Some(temp_dir.path().to_path_buf()), None, None).unwrap();
        assert_eq!(app.learner.as_deref(), Some("sam@example.com"));
        assert_eq!(app.deck_path, temp_dir.path().join("deck.json"));
    }
}
