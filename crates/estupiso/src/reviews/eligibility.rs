use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Rating, RatingScore, RatingSubmission};
use crate::domain::UserId;

pub const DEFAULT_COOLDOWN_MONTHS: u32 = 9;
const DAYS_PER_APPROXIMATE_MONTH: i64 = 30;

/// How whole months between two instants are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthArithmetic {
    /// `floor(days_elapsed / 30)`.
    #[default]
    ThirtyDay,
    /// Full calendar months; day-of-month overflow clamps to the last day.
    Calendar,
}

impl MonthArithmetic {
    /// Whole months elapsed from `since` to `now`; zero when `now` precedes `since`.
    pub fn months_between(self, since: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        if now <= since {
            return 0;
        }

        match self {
            MonthArithmetic::ThirtyDay => {
                let days = (now - since).num_days();
                u32::try_from(days / DAYS_PER_APPROXIMATE_MONTH).unwrap_or(u32::MAX)
            }
            MonthArithmetic::Calendar => {
                let raw = (now.year() - since.year()) * 12 + now.month() as i32
                    - since.month() as i32;
                let mut months = u32::try_from(raw.max(0)).unwrap_or(0);
                while months > 0 && self.add_months(since, months).map_or(true, |at| at > now) {
                    months -= 1;
                }
                months
            }
        }
    }

    /// Instant `months` after `since`.
    pub fn add_months(self, since: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
        match self {
            MonthArithmetic::ThirtyDay => {
                let days = DAYS_PER_APPROXIMATE_MONTH * i64::from(months);
                since.checked_add_signed(Duration::days(days))
            }
            MonthArithmetic::Calendar => since.checked_add_months(Months::new(months)),
        }
    }
}

/// Validation failures for rating submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("rating score must be between 1 and 5 (found {0})")]
    InvalidScore(i64),
    #[error("{rater} already rated {ratee} on {last_rated_at}; next rating allowed from {eligible_on}")]
    CooldownActive {
        rater: UserId,
        ratee: UserId,
        last_rated_at: DateTime<Utc>,
        eligible_on: DateTime<Utc>,
    },
    #[error("malformed rating input: {0}")]
    MalformedInput(&'static str),
}

/// Re-rating cooldown applied per ordered (rater, ratee) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownPolicy {
    months: u32,
    arithmetic: MonthArithmetic,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MONTHS, MonthArithmetic::default())
    }
}

impl CooldownPolicy {
    pub fn new(months: u32, arithmetic: MonthArithmetic) -> Self {
        Self { months, arithmetic }
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn arithmetic(&self) -> MonthArithmetic {
        self.arithmetic
    }

    /// Most recent rating `rater` left for `ratee`.
    pub fn latest<'a>(
        &self,
        rater: &UserId,
        ratee: &UserId,
        existing: &'a [Rating],
    ) -> Option<&'a Rating> {
        existing
            .iter()
            .filter(|rating| rating.is_from_to(rater, ratee))
            .max_by_key(|rating| rating.created_at)
    }

    /// First instant at which a rating made at `last_rated_at` stops blocking.
    pub fn eligible_on(&self, last_rated_at: DateTime<Utc>) -> DateTime<Utc> {
        self.arithmetic
            .add_months(last_rated_at, self.months)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn elapsed(&self, last_rated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.arithmetic.months_between(last_rated_at, now) >= self.months
    }

    pub fn can_rate(
        &self,
        rater: &UserId,
        ratee: &UserId,
        existing: &[Rating],
        now: DateTime<Utc>,
    ) -> bool {
        match self.latest(rater, ratee, existing) {
            Some(last) => self.elapsed(last.created_at, now),
            None => true,
        }
    }

    /// Validate a submission against the ratings already stored for the pair.
    ///
    /// Identity checks run first, then the score range, then the cooldown.
    pub fn submit_rating(
        &self,
        submission: RatingSubmission,
        existing: &[Rating],
        now: DateTime<Utc>,
    ) -> Result<Rating, ReviewError> {
        submission.check_identities()?;
        let score = RatingScore::new(submission.score)?;

        if let Some(last) = self.latest(&submission.rater, &submission.ratee, existing) {
            if !self.elapsed(last.created_at, now) {
                return Err(ReviewError::CooldownActive {
                    rater: submission.rater,
                    ratee: submission.ratee,
                    last_rated_at: last.created_at,
                    eligible_on: self.eligible_on(last.created_at),
                });
            }
        }

        Ok(Rating {
            rater: submission.rater,
            ratee: submission.ratee,
            score,
            comment: submission.comment.trim().to_string(),
            created_at: now,
        })
    }
}

/// [`CooldownPolicy::can_rate`] with the default nine-month, thirty-day-month policy.
pub fn can_rate(rater: &UserId, ratee: &UserId, existing: &[Rating], now: DateTime<Utc>) -> bool {
    CooldownPolicy::default().can_rate(rater, ratee, existing, now)
}

/// [`CooldownPolicy::submit_rating`] with the default policy.
pub fn submit_rating(
    submission: RatingSubmission,
    existing: &[Rating],
    now: DateTime<Utc>,
) -> Result<Rating, ReviewError> {
    CooldownPolicy::default().submit_rating(submission, existing, now)
}
