use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::eligibility::ReviewError;
use crate::domain::UserId;

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingScore(u8);

impl RatingScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ReviewError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ReviewError::InvalidScore(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingScore {
    type Error = ReviewError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingScore> for u8 {
    fn from(score: RatingScore) -> Self {
        score.0
    }
}

/// One directed review: `rater` about `ratee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub rater: UserId,
    pub ratee: UserId,
    pub score: RatingScore,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn is_from_to(&self, rater: &UserId, ratee: &UserId) -> bool {
        self.rater == *rater && self.ratee == *ratee
    }
}

/// Raw review form input, validated by the cooldown policy before it becomes a [`Rating`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSubmission {
    #[serde(default)]
    pub rater: UserId,
    #[serde(default)]
    pub ratee: UserId,
    pub score: i64,
    #[serde(default)]
    pub comment: String,
}

impl RatingSubmission {
    pub fn new(
        rater: impl Into<String>,
        ratee: impl Into<String>,
        score: i64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            rater: UserId::new(rater),
            ratee: UserId::new(ratee),
            score,
            comment: comment.into(),
        }
    }

    /// Reject submissions missing either identity or targeting the rater themselves.
    pub fn check_identities(&self) -> Result<(), ReviewError> {
        if self.rater.is_blank() {
            return Err(ReviewError::MalformedInput("rater identity is missing"));
        }
        if self.ratee.is_blank() {
            return Err(ReviewError::MalformedInput("ratee identity is missing"));
        }
        if self.rater == self.ratee {
            return Err(ReviewError::MalformedInput("users cannot rate themselves"));
        }
        Ok(())
    }
}
