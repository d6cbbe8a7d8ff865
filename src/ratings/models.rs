//! Data models for presentation difficulty ratings

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Patient population a case was studied under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Demographic {
    Neonate,
    Pediatrics,
    Adult,
    Geriatrics,
    Obstetrics,
}

/// VINDICATE etiology categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VindicateCategory {
    Vascular,
    Infectious,
    Neoplastic,
    Degenerative,
    #[serde(rename = "Iatrogenic/Intoxication")]
    Iatrogenic,
    Congeneric,
    Autoimmune,
    Traumatic,
    Endocrine,
}

/// Learner's self-assessed difficulty for one presentation/category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Display names and case-insensitive parsing for the rating enums
macro_rules! named_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s) || format!("{:?}", v).eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let names: Vec<&str> = $ty::ALL.iter().map(|v| v.as_str()).collect();
                        format!("unknown {} '{}' (expected one of: {})", $what, s, names.join(", "))
                    })
            }
        }
    };
}

named_enum!(Demographic, "demographic", {
    Neonate => "Neonate",
    Pediatrics => "Pediatrics",
    Adult => "Adult",
    Geriatrics => "Geriatrics",
    Obstetrics => "Obstetrics",
});

named_enum!(VindicateCategory, "category", {
    Vascular => "Vascular",
    Infectious => "Infectious",
    Neoplastic => "Neoplastic",
    Degenerative => "Degenerative",
    Iatrogenic => "Iatrogenic/Intoxication",
    Congeneric => "Congeneric",
    Autoimmune => "Autoimmune",
    Traumatic => "Traumatic",
    Endocrine => "Endocrine",
});

named_enum!(Difficulty, "difficulty", {
    Easy => "Easy",
    Medium => "Medium",
    Hard => "Hard",
});

/// Category -> difficulty for one presentation
pub type CategoryRatings = BTreeMap<VindicateCategory, Difficulty>;

/// Presentation name -> category ratings for one population
pub type PresentationRatings = BTreeMap<String, CategoryRatings>;

/// All ratings for a learner: population -> presentation -> category -> difficulty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingBook {
    entries: BTreeMap<Demographic, PresentationRatings>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|presentations| presentations.values().all(BTreeMap::is_empty))
    }

    /// Set a rating, replacing any previous one for the same slot
    pub fn set(
        &mut self,
        demographic: Demographic,
        presentation: &str,
        category: VindicateCategory,
        difficulty: Difficulty,
    ) -> Option<Difficulty> {
        self.entries
            .entry(demographic)
            .or_default()
            .entry(presentation.to_string())
            .or_default()
            .insert(category, difficulty)
    }

    pub fn get(
        &self,
        demographic: Demographic,
        presentation: &str,
        category: VindicateCategory,
    ) -> Option<Difficulty> {
        self.entries
            .get(&demographic)?
            .get(presentation)?
            .get(&category)
            .copied()
    }

    /// Every rating as a flat list, ordered by population, presentation, category
    pub fn items(&self) -> Vec<RatedItem> {
        let mut items = Vec::new();
        for (&demographic, presentations) in &self.entries {
            for (presentation, categories) in presentations {
                for (&category, &difficulty) in categories {
                    items.push(RatedItem {
                        demographic,
                        presentation: presentation.clone(),
                        category,
                        difficulty,
                    });
                }
            }
        }
        items
    }
}

/// One flattened rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedItem {
    pub demographic: Demographic,
    #[serde(rename = "presentationName")]
    pub presentation: String,
    pub category: VindicateCategory,
    pub difficulty: Difficulty,
}
