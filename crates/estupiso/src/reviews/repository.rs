use super::domain::Rating;
use super::eligibility::CooldownPolicy;
use crate::domain::UserId;

/// Storage abstraction over the hosted ratings table.
///
/// Implementations must serialize writes per ordered (rater, ratee) pair: the cooldown is
/// re-checked against stored ratings as part of the same write.
pub trait RatingRepository: Send + Sync {
    /// Persist `rating` unless `policy` forbids it given what is already stored for the pair.
    fn insert_if_eligible(
        &self,
        rating: Rating,
        policy: &CooldownPolicy,
    ) -> Result<Rating, RepositoryError>;
    /// Every rating `rater` has left for `ratee`.
    fn between(&self, rater: &UserId, ratee: &UserId) -> Result<Vec<Rating>, RepositoryError>;
    /// Every rating where `user` is either the rater or the ratee.
    fn involving(&self, user: &UserId) -> Result<Vec<Rating>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("a rating for this pair was stored concurrently and is still in cooldown")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
