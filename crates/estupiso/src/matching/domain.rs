use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{ListingId, UserId};

/// Self-declared tidiness. Compares by strictness, so `VeryTidy` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cleanliness {
    VeryTidy,
    Tidy,
    Normal,
    Relaxed,
}

impl Cleanliness {
    /// True when `other` sits exactly one step below `self` on one of the partial-credit pairs.
    ///
    /// Only `VeryTidy -> Tidy` and `Tidy -> Normal` qualify, and only in that direction.
    pub const fn is_adjacent_step_to(self, other: Cleanliness) -> bool {
        matches!(
            (self, other),
            (Cleanliness::VeryTidy, Cleanliness::Tidy) | (Cleanliness::Tidy, Cleanliness::Normal)
        )
    }

    const fn strictness(self) -> u8 {
        match self {
            Cleanliness::VeryTidy => 3,
            Cleanliness::Tidy => 2,
            Cleanliness::Normal => 1,
            Cleanliness::Relaxed => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Cleanliness::VeryTidy => "very_tidy",
            Cleanliness::Tidy => "tidy",
            Cleanliness::Normal => "normal",
            Cleanliness::Relaxed => "relaxed",
        }
    }
}

impl Ord for Cleanliness {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.strictness().cmp(&other.strictness())
    }
}

impl PartialOrd for Cleanliness {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Daily rhythm preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    Early,
    Normal,
    Late,
}

impl Schedule {
    pub const fn label(self) -> &'static str {
        match self {
            Schedule::Early => "early",
            Schedule::Normal => "normal",
            Schedule::Late => "late",
        }
    }
}

/// Profile attributes that feed the compatibility rules.
///
/// Optional fields carry no signal when absent; the matching rule is skipped instead of
/// treating the value as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: UserId,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub max_budget: Option<u32>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub cleanliness: Option<Cleanliness>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub has_pets: bool,
    #[serde(default)]
    pub enjoys_parties: bool,
    #[serde(default)]
    pub gender: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            ..Self::default()
        }
    }

    pub fn shared_interests<'a>(&'a self, other: &'a Person) -> impl Iterator<Item = &'a String> {
        self.interests.intersection(&other.interests)
    }
}

/// Gender preference stated by a listing owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPreference {
    #[default]
    NoPreference,
    Only(String),
}

impl GenderPreference {
    pub fn concrete(&self) -> Option<&str> {
        match self {
            GenderPreference::NoPreference => None,
            GenderPreference::Only(gender) => Some(gender.as_str()),
        }
    }
}

/// Owner-defined profile of the ideal occupant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPreferences {
    #[serde(default)]
    pub preferred_gender: GenderPreference,
    #[serde(default)]
    pub min_age: Option<u8>,
    #[serde(default)]
    pub max_age: Option<u8>,
    #[serde(default)]
    pub cleanliness: Option<Cleanliness>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub preferred_fields: BTreeSet<String>,
    #[serde(default)]
    pub smoking_allowed: bool,
    #[serde(default)]
    pub pets_allowed: bool,
    #[serde(default)]
    pub parties_allowed: bool,
}

impl OwnerPreferences {
    /// Inclusive age window, present only when both bounds are set.
    pub fn age_range(&self) -> Option<(u8, u8)> {
        match (self.min_age, self.max_age) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Rental unit as seen by the matching flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub monthly_price: u32,
    pub zone: String,
    #[serde(default)]
    pub owner_preferences: Option<OwnerPreferences>,
    #[serde(default)]
    pub current_occupant: Option<Person>,
}
