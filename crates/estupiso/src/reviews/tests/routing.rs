use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::reviews::{review_router, CooldownPolicy, RatingSubmission, ReviewService};

fn router_with(ratings: Vec<crate::reviews::Rating>) -> axum::Router {
    let (service, _) = build_service(ratings);
    review_router(Arc::new(service))
}

fn post_review(payload: Value) -> Request<Body> {
    Request::post("/api/v1/reviews")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&payload).expect("serialize payload"),
        ))
        .expect("request builds")
}

fn get(path: &str) -> Request<Body> {
    Request::get(path)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_creates_rating() {
    let router = router_with(Vec::new());

    let response = router
        .oneshot(post_review(json!({
            "rater": "ana",
            "ratee": "lucia",
            "score": 5,
            "comment": "Muy buena convivencia"
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["rater"], json!("ana"));
    assert_eq!(body["score"], json!(5));
}

#[tokio::test]
async fn submit_route_rejects_out_of_range_score() {
    let router = router_with(Vec::new());

    let response = router
        .oneshot(post_review(json!({ "rater": "ana", "ratee": "lucia", "score": 7 })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submit_route_rejects_missing_rater() {
    let router = router_with(Vec::new());

    let response = router
        .oneshot(post_review(json!({ "ratee": "lucia", "score": 4 })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("rater"));
}

#[tokio::test]
async fn submit_route_reports_cooldown_as_conflict() {
    let router = router_with(vec![rating("ana", "lucia", 4, Utc::now())]);

    let response = router
        .oneshot(post_review(json!({ "rater": "ana", "ratee": "lucia", "score": 3 })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(body["ratee"], json!("lucia"));
    assert!(body["eligible_on"].is_string());
}

#[tokio::test]
async fn submit_handler_maps_outage_to_internal_error() {
    let service = Arc::new(ReviewService::new(
        Arc::new(UnavailableRepository),
        CooldownPolicy::default(),
    ));

    let response = crate::reviews::router::submit_handler::<UnavailableRepository>(
        State(service),
        axum::Json(RatingSubmission::new("ana", "lucia", 4, "")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn received_route_hides_unreciprocated_reviews() {
    let now = Utc::now();
    let router = router_with(vec![
        rating("ana", "lucia", 4, now),
        rating("marta", "lucia", 5, now),
        rating("lucia", "marta", 5, now),
    ]);

    let response = router
        .oneshot(get("/api/v1/users/lucia/reviews"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["reviews"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["reviews"][0]["rater"], json!("marta"));
    assert_eq!(body["hidden"], json!(1));
    assert_eq!(body["summary"]["count"], json!(1));
}

#[tokio::test]
async fn pending_route_lists_waiting_raters() {
    let router = router_with(vec![rating("ana", "lucia", 4, Utc::now())]);

    let response = router
        .oneshot(get("/api/v1/users/lucia/reviews/pending"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "user_id": "lucia", "pending": ["ana"] }));
}

#[tokio::test]
async fn eligibility_route_reports_cooldown_state() {
    let router = router_with(vec![rating("ana", "lucia", 4, Utc::now())]);

    let blocked = router
        .clone()
        .oneshot(get("/api/v1/users/ana/reviews/eligibility/lucia"))
        .await
        .expect("router responds");
    let open = router
        .oneshot(get("/api/v1/users/lucia/reviews/eligibility/ana"))
        .await
        .expect("router responds");

    assert_eq!(read_json_body(blocked).await["can_rate"], json!(false));
    assert_eq!(read_json_body(open).await["can_rate"], json!(true));
}
