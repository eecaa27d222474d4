use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Rating, RatingSubmission};
use super::eligibility::{CooldownPolicy, ReviewError};
use super::repository::{RatingRepository, RepositoryError};
use super::visibility::{is_visible_to, pending_notifications, visible_reviews, ReviewSummary};
use crate::domain::UserId;

/// Service composing the cooldown policy with the ratings repository.
pub struct ReviewService<R> {
    repository: Arc<R>,
    policy: CooldownPolicy,
}

impl<R> ReviewService<R>
where
    R: RatingRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: CooldownPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &CooldownPolicy {
        &self.policy
    }

    /// Validate and persist a new rating.
    pub fn submit(
        &self,
        submission: RatingSubmission,
        now: DateTime<Utc>,
    ) -> Result<Rating, ReviewServiceError> {
        submission.check_identities()?;

        let existing = self
            .repository
            .between(&submission.rater, &submission.ratee)?;

        let rating = match self.policy.submit_rating(submission, &existing, now) {
            Ok(rating) => rating,
            Err(error) => {
                tracing::info!(%error, "rating rejected");
                return Err(error.into());
            }
        };

        let stored = self.repository.insert_if_eligible(rating, &self.policy)?;
        tracing::info!(
            rater = %stored.rater,
            ratee = %stored.ratee,
            score = stored.score.get(),
            "rating stored"
        );
        Ok(stored)
    }

    pub fn can_rate(
        &self,
        rater: &UserId,
        ratee: &UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, ReviewServiceError> {
        let existing = self.repository.between(rater, ratee)?;
        Ok(self.policy.can_rate(rater, ratee, &existing, now))
    }

    /// Reviews `user` may read about themselves, with their aggregate.
    pub fn received(&self, user: &UserId) -> Result<ReceivedReviews, ReviewServiceError> {
        let ratings = self.repository.involving(user)?;
        let visible = visible_reviews(user, &ratings);
        let summary = ReviewSummary::from_reviews(&visible);
        let hidden = ratings
            .iter()
            .filter(|rating| rating.ratee == *user && !is_visible_to(user, rating, &ratings))
            .count();

        Ok(ReceivedReviews {
            user: user.clone(),
            reviews: visible.into_iter().cloned().collect(),
            summary,
            hidden,
        })
    }

    /// Users who rated `user` and are waiting for a rating back.
    pub fn pending(&self, user: &UserId) -> Result<Vec<UserId>, ReviewServiceError> {
        let ratings = self.repository.involving(user)?;
        Ok(pending_notifications(user, &ratings))
    }
}

/// Reviews visible to their target plus a count of those still locked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivedReviews {
    pub user: UserId,
    pub reviews: Vec<Rating>,
    pub summary: ReviewSummary,
    /// Ratings about `user` that stay hidden until `user` rates the author back.
    pub hidden: usize,
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
