use serde::Serialize;

use super::domain::{Listing, Person};
use super::CompatibilityEngine;

/// One scored entry of a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch<'a, T> {
    pub score: u8,
    pub subject: &'a T,
}

/// Sort by score descending. `sort_by` is stable, so ties keep their input order.
fn rank<'a, T, F>(items: &'a [T], score: F) -> Vec<RankedMatch<'a, T>>
where
    F: Fn(&T) -> u8,
{
    let mut ranked: Vec<RankedMatch<'a, T>> = items
        .iter()
        .map(|subject| RankedMatch {
            score: score(subject),
            subject,
        })
        .collect();
    ranked.sort_by(|left, right| right.score.cmp(&left.score));
    ranked
}

impl CompatibilityEngine {
    /// Rank potential roommates for `candidate`, best match first.
    pub fn rank_people<'a>(
        &self,
        candidate: &Person,
        others: &'a [Person],
    ) -> Vec<RankedMatch<'a, Person>> {
        rank(others, |other| self.person_compatibility(candidate, other))
    }

    /// Rank listings for `candidate`, best match first.
    pub fn rank_listings<'a>(
        &self,
        candidate: &Person,
        listings: &'a [Listing],
    ) -> Vec<RankedMatch<'a, Listing>> {
        rank(listings, |listing| self.listing_compatibility(candidate, listing))
    }
}
