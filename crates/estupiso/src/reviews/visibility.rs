use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::Rating;
use crate::domain::UserId;

fn has_rated(all: &[Rating], rater: &UserId, ratee: &UserId) -> bool {
    all.iter().any(|rating| rating.is_from_to(rater, ratee))
}

/// Whether `ratee` may read `rating`.
///
/// A rating becomes readable to its target once the target has rated the author back,
/// regardless of when. Ratings about someone else are never visible through this check.
pub fn is_visible_to(ratee: &UserId, rating: &Rating, all: &[Rating]) -> bool {
    rating.ratee == *ratee && has_rated(all, ratee, &rating.rater)
}

/// Raters of `user` whom `user` has not rated back, in order of first appearance.
pub fn pending_notifications(user: &UserId, all: &[Rating]) -> Vec<UserId> {
    let mut seen = BTreeSet::new();
    all.iter()
        .filter(|rating| rating.ratee == *user && rating.rater != *user)
        .filter(|rating| !has_rated(all, user, &rating.rater))
        .filter(|rating| seen.insert(rating.rater.clone()))
        .map(|rating| rating.rater.clone())
        .collect()
}

/// Latest rating from each rater about `user` that `user` is allowed to read, newest first.
pub fn visible_reviews<'a>(user: &UserId, all: &'a [Rating]) -> Vec<&'a Rating> {
    let mut latest: Vec<&'a Rating> = Vec::new();
    for rating in all.iter().filter(|rating| is_visible_to(user, rating, all)) {
        match latest.iter().position(|kept| kept.rater == rating.rater) {
            Some(index) if latest[index].created_at < rating.created_at => latest[index] = rating,
            Some(_) => {}
            None => latest.push(rating),
        }
    }
    latest.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    latest
}

/// Aggregate of the reviews a user can see about themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[&Rating]) -> Self {
        let count = reviews.len();
        let average = if count == 0 {
            None
        } else {
            let total: u32 = reviews
                .iter()
                .map(|rating| u32::from(rating.score.get()))
                .sum();
            Some(f64::from(total) / count as f64)
        };
        Self { count, average }
    }
}
