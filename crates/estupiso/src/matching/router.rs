use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{Listing, Person};
use super::CompatibilityEngine;
use crate::domain::{ListingId, UserId};

/// Router builder exposing scoring endpoints for the swipe and listing feeds.
pub fn matching_router(engine: Arc<CompatibilityEngine>) -> Router {
    Router::new()
        .route("/api/v1/matching/people", post(rank_people_handler))
        .route("/api/v1/matching/listings", post(rank_listings_handler))
        .route("/api/v1/matching/breakdown", post(breakdown_handler))
        .with_state(engine)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankPeopleRequest {
    pub candidate: Person,
    pub others: Vec<Person>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankListingsRequest {
    pub candidate: Person,
    pub listings: Vec<Listing>,
}

/// Explain a single score. Exactly one of `other` or `listing` must be present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BreakdownRequest {
    pub candidate: Person,
    #[serde(default)]
    pub other: Option<Person>,
    #[serde(default)]
    pub listing: Option<Listing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonMatchView {
    pub user_id: UserId,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingMatchView {
    pub listing_id: ListingId,
    pub score: u8,
}

pub(crate) async fn rank_people_handler(
    State(engine): State<Arc<CompatibilityEngine>>,
    axum::Json(request): axum::Json<RankPeopleRequest>,
) -> Response {
    let matches: Vec<PersonMatchView> = engine
        .rank_people(&request.candidate, &request.others)
        .into_iter()
        .map(|ranked| PersonMatchView {
            user_id: ranked.subject.id.clone(),
            score: ranked.score,
        })
        .collect();

    tracing::debug!(
        candidate = %request.candidate.id,
        scored = matches.len(),
        "ranked roommate candidates"
    );

    (StatusCode::OK, axum::Json(matches)).into_response()
}

pub(crate) async fn rank_listings_handler(
    State(engine): State<Arc<CompatibilityEngine>>,
    axum::Json(request): axum::Json<RankListingsRequest>,
) -> Response {
    let matches: Vec<ListingMatchView> = engine
        .rank_listings(&request.candidate, &request.listings)
        .into_iter()
        .map(|ranked| ListingMatchView {
            listing_id: ranked.subject.id.clone(),
            score: ranked.score,
        })
        .collect();

    tracing::debug!(
        candidate = %request.candidate.id,
        scored = matches.len(),
        "ranked listings"
    );

    (StatusCode::OK, axum::Json(matches)).into_response()
}

pub(crate) async fn breakdown_handler(
    State(engine): State<Arc<CompatibilityEngine>>,
    axum::Json(request): axum::Json<BreakdownRequest>,
) -> Response {
    let breakdown = match (&request.other, &request.listing) {
        (Some(other), None) => engine.person_breakdown(&request.candidate, other),
        (None, Some(listing)) => engine.listing_breakdown(&request.candidate, listing),
        _ => {
            let payload = serde_json::json!({
                "error": "provide exactly one of `other` or `listing`",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    (StatusCode::OK, axum::Json(breakdown)).into_response()
}
