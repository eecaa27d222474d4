use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::RatingSubmission;
use super::eligibility::ReviewError;
use super::repository::{RatingRepository, RepositoryError};
use super::service::{ReviewService, ReviewServiceError};
use crate::domain::UserId;

/// Router builder exposing review submission and the per-user review views.
pub fn review_router<R>(service: Arc<ReviewService<R>>) -> Router
where
    R: RatingRepository + 'static,
{
    Router::new()
        .route("/api/v1/reviews", post(submit_handler::<R>))
        .route("/api/v1/users/:user_id/reviews", get(received_handler::<R>))
        .route(
            "/api/v1/users/:user_id/reviews/pending",
            get(pending_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/reviews/eligibility/:ratee_id",
            get(eligibility_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: ReviewServiceError) -> Response {
    let message = error.to_string();
    let (status, payload) = match &error {
        ReviewServiceError::Review(ReviewError::CooldownActive {
            ratee, eligible_on, ..
        }) => (
            StatusCode::CONFLICT,
            json!({ "error": message, "ratee": ratee, "eligible_on": eligible_on }),
        ),
        ReviewServiceError::Review(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": message }),
        ),
        ReviewServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": message }))
        }
        ReviewServiceError::Repository(RepositoryError::Unavailable(_)) => {
            tracing::error!(error = %message, "ratings repository unavailable");
            (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
        }
    };

    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    axum::Json(submission): axum::Json<RatingSubmission>,
) -> Response
where
    R: RatingRepository + 'static,
{
    match service.submit(submission, Utc::now()) {
        Ok(rating) => (StatusCode::CREATED, axum::Json(rating)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn received_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: RatingRepository + 'static,
{
    match service.received(&UserId(user_id)) {
        Ok(received) => (StatusCode::OK, axum::Json(received)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pending_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: RatingRepository + 'static,
{
    let user = UserId(user_id);
    match service.pending(&user) {
        Ok(pending) => {
            let payload = json!({ "user_id": user, "pending": pending });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((user_id, ratee_id)): Path<(String, String)>,
) -> Response
where
    R: RatingRepository + 'static,
{
    let rater = UserId(user_id);
    let ratee = UserId(ratee_id);
    match service.can_rate(&rater, &ratee, Utc::now()) {
        Ok(can_rate) => {
            let payload = json!({ "rater": rater, "ratee": ratee, "can_rate": can_rate });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
