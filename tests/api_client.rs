mod common;

use axum::http::StatusCode;
use common::{dead_url, spawn_stub_api};
use reviewdesk::api::{ReviewsBackend, ReviewsClient};
use reviewdesk::error::ApiError;
use reviewdesk::models::{ListQuery, Rating, ReviewSubmission};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn health_ok_and_failures() {
    let (url, stub) = spawn_stub_api().await;
    let client = ReviewsClient::new(url).unwrap();
    assert_eq!(client.health().await, Ok(()));

    stub.respond(StatusCode::SERVICE_UNAVAILABLE, json!({"detail": "down"}));
    assert_eq!(client.health().await, Err(ApiError::Unreachable));

    let dead = ReviewsClient::new(dead_url().await).unwrap();
    assert_eq!(dead.health().await, Err(ApiError::Unreachable));
}

#[tokio::test]
async fn list_sends_page_params_and_normalizes_ids() {
    let (url, stub) = spawn_stub_api().await;
    let client = ReviewsClient::new(url).unwrap();

    let page = client.list_reviews(&ListQuery::first_page(None)).await.unwrap();
    let query = stub.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.get("limit").map(String::as_str), Some("50"));
    assert_eq!(query.get("skip").map(String::as_str), Some("0"));
    assert!(!query.contains_key("rating"));

    assert_eq!(page.total, 1);
    assert_eq!(page.reviews[0].id.as_str(), "65a1b2c3d4e5f60718293a4b");
    assert_eq!(page.reviews[0].rating, 4);

    client.list_reviews(&ListQuery::first_page(Rating::new(3))).await.unwrap();
    let query = stub.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.get("rating").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn list_failure_prefers_server_detail() {
    let (url, stub) = spawn_stub_api().await;
    let client = ReviewsClient::new(url).unwrap();

    stub.respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "Failed to fetch reviews: database offline"}),
    );
    assert_eq!(
        client.list_reviews(&ListQuery::first_page(None)).await,
        Err(ApiError::Rejected("Failed to fetch reviews: database offline".into()))
    );

    stub.respond(StatusCode::BAD_GATEWAY, json!({}));
    let err = client.list_reviews(&ListQuery::first_page(None)).await.unwrap_err();
    assert_eq!(err.message(), "Failed to fetch reviews");

    let dead = ReviewsClient::new(dead_url().await).unwrap();
    let err = dead.list_reviews(&ListQuery::first_page(None)).await.unwrap_err();
    assert_eq!(err.message(), "Failed to fetch reviews");
}

#[tokio::test]
async fn stats_parse_and_fallback() {
    let (url, stub) = spawn_stub_api().await;
    let client = ReviewsClient::new(url).unwrap();

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_reviews, 3);
    assert_eq!(stats.most_common_rating(), Some(4));

    stub.respond(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "nope"}));
    assert_eq!(client.stats().await.unwrap_err().message(), "Failed to fetch statistics");
}

fn submission() -> ReviewSubmission {
    ReviewSubmission {
        rating: Rating::new(5).unwrap(),
        review_text: "  Excellent pastries and coffee.  ".to_string(),
    }
}

#[tokio::test]
async fn submit_posts_raw_text_and_returns_ai_response() {
    let (url, stub) = spawn_stub_api().await;
    let client = ReviewsClient::new(url).unwrap();

    let receipt = client.submit_review(&submission()).await.unwrap();
    assert_eq!(receipt.ai_response, "We're thrilled you enjoyed it!");
    assert_eq!(receipt.submission_id.as_deref(), Some("65a1b2c3d4e5f60718293a4b"));

    let body = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body, json!({"rating": 5, "review_text": "  Excellent pastries and coffee.  "}));
}

#[tokio::test]
async fn submit_failures_are_distinguished() {
    let (url, stub) = spawn_stub_api().await;
    let client = ReviewsClient::new(url).unwrap();

    stub.respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "Failed to submit review: LLM unavailable"}),
    );
    assert_eq!(
        client.submit_review(&submission()).await.unwrap_err().message(),
        "Failed to submit review: LLM unavailable"
    );

    stub.respond(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    assert_eq!(
        client.submit_review(&submission()).await.unwrap_err().message(),
        "Failed to submit review"
    );

    let dead = ReviewsClient::new(dead_url().await).unwrap();
    assert_eq!(dead.submit_review(&submission()).await, Err(ApiError::NoResponse));
}

#[tokio::test]
async fn slow_replies_time_out_through_the_normal_error_path() {
    let (url, stub) = spawn_stub_api().await;
    stub.stall_for(Duration::from_secs(5));
    let client = ReviewsClient::with_timeout(url, Duration::from_millis(200)).unwrap();

    assert_eq!(
        client.list_reviews(&ListQuery::first_page(None)).await,
        Err(ApiError::RequestFailed("Failed to fetch reviews".into()))
    );
    assert_eq!(
        client.stats().await.unwrap_err().message(),
        "Failed to fetch statistics"
    );
    assert_eq!(client.submit_review(&submission()).await, Err(ApiError::NoResponse));
    assert_eq!(client.health().await, Err(ApiError::Unreachable));
}
