use chrono::NaiveDate;
use estupiso::config::AppConfig;
use estupiso::domain::UserId;
use estupiso::error::AppError;
use estupiso::matching::{AffinityTable, CompatibilityEngine};
use estupiso::reviews::{
    CooldownPolicy, Rating, RatingRepository, RepositoryError, ReviewService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local ratings store. The mutex makes the cooldown re-check and the append atomic.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRatingRepository {
    ratings: Arc<Mutex<Vec<Rating>>>,
}

impl InMemoryRatingRepository {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<Rating>>, RepositoryError> {
        self.ratings
            .lock()
            .map_err(|_| RepositoryError::Unavailable("ratings mutex poisoned".to_string()))
    }

    pub(crate) fn len(&self) -> usize {
        self.guard().map(|ratings| ratings.len()).unwrap_or_default()
    }
}

impl RatingRepository for InMemoryRatingRepository {
    fn insert_if_eligible(
        &self,
        rating: Rating,
        policy: &CooldownPolicy,
    ) -> Result<Rating, RepositoryError> {
        let mut guard = self.guard()?;
        if !policy.can_rate(&rating.rater, &rating.ratee, &guard, rating.created_at) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(rating.clone());
        Ok(rating)
    }

    fn between(&self, rater: &UserId, ratee: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .iter()
            .filter(|rating| rating.is_from_to(rater, ratee))
            .cloned()
            .collect())
    }

    fn involving(&self, user: &UserId) -> Result<Vec<Rating>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .iter()
            .filter(|rating| rating.rater == *user || rating.ratee == *user)
            .cloned()
            .collect())
    }
}

/// Engine using the configured affinity table, or the bundled one when none is set.
pub(crate) fn build_engine(config: &AppConfig) -> Result<CompatibilityEngine, AppError> {
    let table = match &config.matching.affinity_table {
        Some(path) => {
            let table = AffinityTable::from_path(path)?;
            tracing::info!(path = %path.display(), fields = table.len(), "loaded affinity table");
            table
        }
        None => AffinityTable::standard(),
    };
    Ok(CompatibilityEngine::new(table))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn build_review_service(
    config: &AppConfig,
    repository: Arc<InMemoryRatingRepository>,
) -> ReviewService<InMemoryRatingRepository> {
    ReviewService::new(repository, config.reviews.cooldown_policy())
}
