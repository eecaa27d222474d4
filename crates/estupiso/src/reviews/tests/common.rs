use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::domain::UserId;
use crate::reviews::{
    CooldownPolicy, Rating, RatingRepository, RatingScore, RepositoryError, ReviewService,
};

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn days_after(start: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    start + Duration::days(days)
}

pub(super) fn user(id: &str) -> UserId {
    UserId::new(id)
}

pub(super) fn rating(rater: &str, ratee: &str, score: i64, created_at: DateTime<Utc>) -> Rating {
    Rating {
        rater: user(rater),
        ratee: user(ratee),
        score: RatingScore::new(score).expect("valid score"),
        comment: format!("{rater} about {ratee}"),
        created_at,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) ratings: Arc<Mutex<Vec<Rating>>>,
}

impl MemoryRepository {
    pub(super) fn seeded(ratings: Vec<Rating>) -> Self {
        Self {
            ratings: Arc::new(Mutex::new(ratings)),
        }
    }

    pub(super) fn stored(&self) -> Vec<Rating> {
        self.ratings.lock().expect("repository mutex poisoned").clone()
    }
}

impl RatingRepository for MemoryRepository {
    fn insert_if_eligible(
        &self,
        rating: Rating,
        policy: &CooldownPolicy,
    ) -> Result<Rating, RepositoryError> {
        let mut guard = self.ratings.lock().expect("repository mutex poisoned");
        if !policy.can_rate(&rating.rater, &rating.ratee, &guard, rating.created_at) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(rating.clone());
        Ok(rating)
    }

    fn between(&self, rater: &UserId, ratee: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        let guard = self.ratings.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rating| rating.is_from_to(rater, ratee))
            .cloned()
            .collect())
    }

    fn involving(&self, user: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        let guard = self.ratings.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rating| rating.rater == *user || rating.ratee == *user)
            .cloned()
            .collect())
    }
}

/// Returns an empty snapshot for reads, as if another writer landed after the read.
pub(super) struct StaleSnapshotRepository {
    pub(super) inner: MemoryRepository,
}

impl RatingRepository for StaleSnapshotRepository {
    fn insert_if_eligible(
        &self,
        rating: Rating,
        policy: &CooldownPolicy,
    ) -> Result<Rating, RepositoryError> {
        self.inner.insert_if_eligible(rating, policy)
    }

    fn between(&self, _rater: &UserId, _ratee: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        Ok(Vec::new())
    }

    fn involving(&self, user: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        self.inner.involving(user)
    }
}

pub(super) struct UnavailableRepository;

impl RatingRepository for UnavailableRepository {
    fn insert_if_eligible(
        &self,
        _rating: Rating,
        _policy: &CooldownPolicy,
    ) -> Result<Rating, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn between(&self, _rater: &UserId, _ratee: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn involving(&self, _user: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    ratings: Vec<Rating>,
) -> (ReviewService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded(ratings));
    let service = ReviewService::new(repository.clone(), CooldownPolicy::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
