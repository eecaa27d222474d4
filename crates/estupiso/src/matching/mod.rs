//! Heuristic compatibility scoring between people and between a person and a listing.
//!
//! Every score starts from a neutral 50, collects additive and subtractive rule
//! contributions, and is clamped to `[0, 100]`. Rules whose inputs are missing are skipped.

mod affinity;
pub mod domain;
mod ranking;
pub mod router;
mod rules;

#[cfg(test)]
mod tests;

pub use affinity::{AffinityTable, AffinityTableError};
pub use domain::{Cleanliness, GenderPreference, Listing, OwnerPreferences, Person, Schedule};
pub use ranking::RankedMatch;
pub use router::matching_router;

use serde::{Deserialize, Serialize};

/// Stateless scorer holding the field-of-study affinity table.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEngine {
    affinity: AffinityTable,
}

impl CompatibilityEngine {
    pub fn new(affinity: AffinityTable) -> Self {
        Self { affinity }
    }

    /// Engine seeded with [`AffinityTable::standard`].
    pub fn standard() -> Self {
        Self::new(AffinityTable::standard())
    }

    pub fn affinity(&self) -> &AffinityTable {
        &self.affinity
    }

    /// Compatibility of `candidate` with a potential roommate. Not symmetric.
    pub fn person_compatibility(&self, candidate: &Person, other: &Person) -> u8 {
        rules::score_people(candidate, other, &self.affinity).clamped()
    }

    /// Compatibility of `candidate` with a listing, its owner preferences and its occupant.
    pub fn listing_compatibility(&self, candidate: &Person, listing: &Listing) -> u8 {
        rules::score_listing(candidate, listing, &self.affinity).clamped()
    }

    pub fn person_breakdown(&self, candidate: &Person, other: &Person) -> CompatibilityBreakdown {
        let tally = rules::score_people(candidate, other, &self.affinity);
        CompatibilityBreakdown::from_tally(tally)
    }

    pub fn listing_breakdown(
        &self,
        candidate: &Person,
        listing: &Listing,
    ) -> CompatibilityBreakdown {
        let tally = rules::score_listing(candidate, listing, &self.affinity);
        CompatibilityBreakdown::from_tally(tally)
    }
}

/// Attribute a rule contribution was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityFactor {
    SharedInterests,
    Zone,
    Budget,
    Cleanliness,
    Schedule,
    FieldAffinity,
    Smoking,
    Pets,
    Parties,
    Occupant,
    Gender,
    AgeRange,
    PreferredField,
}

/// Discrete contribution to a score, kept so the UI can explain a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: CompatibilityFactor,
    pub points: f64,
    pub notes: String,
}

/// Final score plus the unclamped total and the rules that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    pub score: u8,
    pub raw_total: f64,
    pub components: Vec<ScoreComponent>,
}

impl CompatibilityBreakdown {
    fn from_tally(tally: rules::Tally) -> Self {
        Self {
            score: tally.clamped(),
            raw_total: tally.total,
            components: tally.components,
        }
    }
}
