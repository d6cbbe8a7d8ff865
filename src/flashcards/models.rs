//! Data models for the flashcard system

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Ease factor assigned to a card the first time it is graded
pub const INITIAL_EASE: f64 = 2.5;

/// Minimum ease factor allowed
pub const MIN_EASE: f64 = 1.3;

/// Which side of a fact pair is shown on the front of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectionMode {
    /// Front is a clinical presentation, back lists its differentials
    #[serde(rename = "presentation")]
    PresentationToDifferential,
    /// Front is a differential, back lists every presentation naming it
    #[serde(rename = "differential")]
    DifferentialToPresentation,
}

impl DirectionMode {
    /// Prefix used when deriving card ids, so both directions never collide
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::PresentationToDifferential => "p",
            Self::DifferentialToPresentation => "d",
        }
    }
}

impl Default for DirectionMode {
    fn default() -> Self {
        Self::PresentationToDifferential
    }
}

impl FromStr for DirectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "presentation" | "p" => Ok(Self::PresentationToDifferential),
            "differential" | "d" => Ok(Self::DifferentialToPresentation),
            other => Err(format!(
                "unknown mode '{}' (expected 'presentation' or 'differential')",
                other
            )),
        }
    }
}

/// Category restriction applied before building a catalog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

/// One raw presentation to differentials pair supplied by a deck source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactPair {
    #[serde(alias = "presentation")]
    pub front: String,
    #[serde(alias = "differentials")]
    pub back: Vec<String>,
    #[serde(alias = "system")]
    pub category: String,
}

impl FactPair {
    pub fn new(front: impl Into<String>, back: &[&str], category: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.iter().map(|s| s.to_string()).collect(),
            category: category.into(),
        }
    }
}

/// A schedulable flashcard. Rebuilt from the deck on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: Vec<String>,
}

/// Learner's self-reported recall outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    pub fn label(self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the grade name, its first letter, or the 1-4 button number
impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "a" | "1" => Ok(Self::Again),
            "hard" | "h" | "2" => Ok(Self::Hard),
            "good" | "g" | "3" => Ok(Self::Good),
            "easy" | "e" | "4" => Ok(Self::Easy),
            other => Err(format!(
                "unknown grade '{}' (expected again, hard, good or easy)",
                other
            )),
        }
    }
}

/// Persisted scheduling state for a card that has been graded at least once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProgress {
    /// When the card is due for review
    #[serde(rename = "reviewDate", with = "epoch_millis")]
    pub review_due_at: DateTime<Utc>,
    /// Current interval in days; 0 until the card graduates
    #[serde(default)]
    pub interval_days: f64,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
}

fn default_ease_factor() -> f64 {
    INITIAL_EASE
}

impl CardProgress {
    /// State a card is graded from the first time it is seen
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            review_due_at: now,
            interval_days: 0.0,
            ease_factor: INITIAL_EASE,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.review_due_at <= now
    }

    /// Whether the card has completed at least one non-again grading
    /// since it was last failed
    pub fn is_graduated(&self) -> bool {
        self.interval_days > 0.0
    }
}

/// Card id -> scheduling state, as stored in the progress blob
pub type ProgressMap = BTreeMap<String, CardProgress>;

/// Where a card sits in its learning cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never graded
    New,
    /// Graded, but not yet graduated (or failed since)
    Learning,
    /// Regular spaced review
    Review,
}

impl CardStatus {
    pub fn of(progress: Option<&CardProgress>) -> Self {
        match progress {
            None => Self::New,
            Some(p) if p.is_graduated() => Self::Review,
            Some(_) => Self::Learning,
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_again_minutes", deserialize_with = "again_minutes_or_default")]
    pub again_minutes: i32,
    #[serde(default = "default_good_days", deserialize_with = "good_days_or_default")]
    pub good_days: i32,
    #[serde(default = "default_easy_days", deserialize_with = "easy_days_or_default")]
    pub easy_days: i32,
    #[serde(default = "default_new_cards_per_day", deserialize_with = "new_cards_per_day_or_default")]
    pub new_cards_per_day: i32,
}

/// Read an integer setting, accepting numeric strings and fractional numbers
/// (truncated). Nulls and anything else unusable fall back to `default`.
fn setting_or_default<'de, D: Deserializer<'de>>(deserializer: D, name: &str, default: i32) -> Result<i32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(|n| i32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        log::warn!("Using default {} for unusable setting {}: {}", default, name, value);
        default
    }))
}

fn again_minutes_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    setting_or_default(deserializer, "againMinutes", default_again_minutes())
}

fn good_days_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    setting_or_default(deserializer, "goodDays", default_good_days())
}

fn easy_days_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    setting_or_default(deserializer, "easyDays", default_easy_days())
}

fn new_cards_per_day_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    setting_or_default(deserializer, "newCardsPerDay", default_new_cards_per_day())
}

fn default_again_minutes() -> i32 {
    10
}

fn default_good_days() -> i32 {
    1
}

fn default_easy_days() -> i32 {
    4
}

fn default_new_cards_per_day() -> i32 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            again_minutes: default_again_minutes(),
            good_days: default_good_days(),
            easy_days: default_easy_days(),
            new_cards_per_day: default_new_cards_per_day(),
        }
    }
}

impl Settings {
    /// Clamp out-of-range values to 0
    pub fn sanitized(self) -> Self {
        let clamped = Self {
            again_minutes: self.again_minutes.max(0),
            good_days: self.good_days.max(0),
            easy_days: self.easy_days.max(0),
            new_cards_per_day: self.new_cards_per_day.max(0),
        };
        if clamped != self {
            log::warn!("Clamped negative flashcard settings {:?} to {:?}", self, clamped);
        }
        clamped
    }

    /// Daily cap on never-seen cards admitted to a queue
    pub fn new_card_limit(&self) -> usize {
        usize::try_from(self.new_cards_per_day).unwrap_or(0)
    }
}

/// Epoch-millisecond timestamps. Older blobs may hold fractional millis.
mod epoch_millis {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() {
            return Err(de::Error::custom("timestamp is not a finite number"));
        }
        Utc.timestamp_millis_opt(millis.round() as i64)
            .single()
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", millis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_progress_uses_stored_layout() {
        let due = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let progress = CardProgress {
            review_due_at: due,
            interval_days: 4.0,
            ease_factor: 2.65,
        };

        let value = serde_json::to_value(progress).unwrap();
        assert_eq!(value["reviewDate"], 1_700_000_000_000i64);
        assert_eq!(value["intervalDays"], 4.0);
        assert_eq!(value["easeFactor"], 2.65);
    }

    #[test]
    fn test_progress_accepts_fractional_millis() {
        let json = r#"{"reviewDate": 1700000000000.4, "intervalDays": 2.5, "easeFactor": 2.35}"#;
        let progress: CardProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.review_due_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(progress.interval_days, 2.5);
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"goodDays": 2}"#).unwrap();
        assert_eq!(
            settings,
            Settings {
                again_minutes: 10,
                good_days: 2,
                easy_days: 4,
                new_cards_per_day: 20,
            }
        );
    }

    #[test]
    fn test_settings_bad_field_keeps_the_others() {
        let json = r#"{"againMinutes": null, "goodDays": 3, "easyDays": "7", "newCardsPerDay": 5.9}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings,
            Settings {
                again_minutes: 10,
                good_days: 3,
                easy_days: 7,
                new_cards_per_day: 5,
            }
        );

        let settings: Settings = serde_json::from_str(r#"{"goodDays": "soon", "easyDays": 1e12}"#).unwrap();
        assert_eq!(settings.good_days, 1);
        assert_eq!(settings.easy_days, 4);
    }

    #[test]
    fn test_settings_sanitized_clamps_negatives() {
        let settings = Settings {
            again_minutes: -5,
            good_days: 1,
            easy_days: 4,
            new_cards_per_day: -3,
        }
        .sanitized();

        assert_eq!(settings.again_minutes, 0);
        assert_eq!(settings.new_cards_per_day, 0);
        assert_eq!(settings.new_card_limit(), 0);
        assert_eq!(settings.good_days, 1);
    }

    #[test]
    fn test_grade_parsing() {
        assert_eq!("Again".parse::<Grade>().unwrap(), Grade::Again);
        assert_eq!("h".parse::<Grade>().unwrap(), Grade::Hard);
        assert_eq!("3".parse::<Grade>().unwrap(), Grade::Good);
        assert_eq!(" easy ".parse::<Grade>().unwrap(), Grade::Easy);
        assert!("medium".parse::<Grade>().is_err());
    }

    #[test]
    fn test_category_filter() {
        assert_eq!(CategoryFilter::from("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        let cardio = CategoryFilter::from("Cardiovascular");
        assert!(cardio.matches("Cardiovascular"));
        assert!(!cardio.matches("Respiratory"));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn test_fact_pair_accepts_deck_field_names() {
        let json = r#"{"presentation": "Chest pain", "differentials": ["MI", "PE"], "system": "Cardiovascular"}"#;
        let pair: FactPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair, FactPair::new("Chest pain", &["MI", "PE"], "Cardiovascular"));
    }

    #[test]
    fn test_card_status() {
        let now = Utc::now();
        assert_eq!(CardStatus::of(None), CardStatus::New);
        let mut progress = CardProgress::seed(now);
        assert_eq!(CardStatus::of(Some(&progress)), CardStatus::Learning);
        progress.interval_days = 1.0;
        assert_eq!(CardStatus::of(Some(&progress)), CardStatus::Review);
    }
}
