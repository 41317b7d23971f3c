#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reviewdesk::api::ReviewsBackend;
use reviewdesk::error::{ApiError, ApiResult};
use reviewdesk::models::{ListQuery, ReviewPage, ReviewSubmission, Stats, SubmitReceipt};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory backend whose behaviour each test scripts.
///
/// Every list call returns one review whose id is `r<call number>` and whose
/// rating echoes the filter (5 when unfiltered), so tests can tell which
/// call's result was committed.
pub struct ScriptedBackend {
    pub healthy: AtomicBool,
    pub list_error: Mutex<Option<ApiError>>,
    pub list_delays: Mutex<VecDeque<Duration>>,
    pub queries: Mutex<Vec<ListQuery>>,
    pub stats_calls: AtomicUsize,
    pub submissions: Mutex<Vec<ReviewSubmission>>,
    pub submit_result: Mutex<ApiResult<SubmitReceipt>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            list_error: Mutex::new(None),
            list_delays: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
            stats_calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            submit_result: Mutex::new(Ok(SubmitReceipt {
                ai_response: "Thank you! We're glad you enjoyed your visit.".to_string(),
                submission_id: Some("65a1b2c3d4e5f60718293a4b".to_string()),
                message: Some("Review submitted successfully".to_string()),
            })),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_lists(&self, error: Option<ApiError>) {
        *self.list_error.lock().unwrap() = error;
    }

    pub fn delay_next_lists(&self, delays: &[u64]) {
        let mut queue = self.list_delays.lock().unwrap();
        queue.extend(delays.iter().map(|secs| Duration::from_secs(*secs)));
    }

    pub fn fail_submit(&self, error: ApiError) {
        *self.submit_result.lock().unwrap() = Err(error);
    }

    pub fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<ReviewSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewsBackend for ScriptedBackend {
    async fn health(&self) -> ApiResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::Unreachable)
        }
    }

    async fn list_reviews(&self, query: &ListQuery) -> ApiResult<ReviewPage> {
        let call = {
            let mut queries = self.queries.lock().unwrap();
            queries.push(query.clone());
            queries.len()
        };
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }

        let rating = query.rating.map_or(5, |r| r.get());
        let review = serde_json::from_value(json!({
            "_id": format!("r{}", call),
            "rating": rating,
            "review_text": format!("Review number {}", call),
            "timestamp": "2024-03-20T15:25:00",
            "ai_summary": "Summary",
            "suggested_actions": ["Follow up"]
        }))
        .expect("fixture review");
        Ok(ReviewPage {
            total: 1,
            reviews: vec![review],
        })
    }

    async fn stats(&self) -> ApiResult<Stats> {
        let n = self.stats_calls.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        Ok(Stats {
            total_reviews: n,
            average_rating: 4.5,
            rating_distribution: [(5, n)].into_iter().collect(),
            recent_count_24h: 1,
        })
    }

    async fn submit_review(&self, submission: &ReviewSubmission) -> ApiResult<SubmitReceipt> {
        self.submissions.lock().unwrap().push(submission.clone());
        self.submit_result.lock().unwrap().clone()
    }
}

/// What the stub API should answer with.
#[derive(Clone, Default)]
pub struct StubScript {
    pub status: Option<StatusCode>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct StubState {
    pub script: Arc<Mutex<StubScript>>,
    pub last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
    pub last_body: Arc<Mutex<Option<Value>>>,
    pub stall: Arc<Mutex<Option<Duration>>>,
}

impl StubState {
    pub fn respond(&self, status: StatusCode, body: Value) {
        *self.script.lock().unwrap() = StubScript {
            status: Some(status),
            body: Some(body),
        };
    }

    /// Hold every later reply for `delay` before answering.
    pub fn stall_for(&self, delay: Duration) {
        *self.stall.lock().unwrap() = Some(delay);
    }

    async fn wait(&self) {
        let stall = *self.stall.lock().unwrap();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
    }

    fn reply(&self, default: Value) -> axum::response::Response {
        let script = self.script.lock().unwrap().clone();
        let status = script.status.unwrap_or(StatusCode::OK);
        let body = script.body.unwrap_or(default);
        (status, Json(body)).into_response()
    }
}

async fn stub_health(State(stub): State<StubState>) -> axum::response::Response {
    stub.wait().await;
    stub.reply(json!({"status": "healthy", "service": "review-feedback-api"}))
}

async fn stub_list(
    State(stub): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    *stub.last_query.lock().unwrap() = Some(params);
    stub.wait().await;
    stub.reply(json!({
        "success": true,
        "total": 1,
        "reviews": [{
            "_id": "65a1b2c3d4e5f60718293a4b",
            "timestamp": "2024-03-20T15:25:00",
            "rating": 4,
            "review_text": "Friendly staff and quick service.",
            "ai_response": "Thanks!",
            "ai_summary": "Positive experience with staff.",
            "suggested_actions": ["Recognize staff"]
        }]
    }))
}

async fn stub_stats(State(stub): State<StubState>) -> axum::response::Response {
    stub.wait().await;
    stub.reply(json!({
        "success": true,
        "total_reviews": 3,
        "rating_distribution": {"1": 0, "2": 0, "3": 1, "4": 2, "5": 0},
        "average_rating": 3.67,
        "recent_count_24h": 3
    }))
}

async fn stub_submit(State(stub): State<StubState>, Json(body): Json<Value>) -> axum::response::Response {
    *stub.last_body.lock().unwrap() = Some(body);
    stub.wait().await;
    stub.reply(json!({
        "success": true,
        "message": "Review submitted successfully",
        "submission_id": "65a1b2c3d4e5f60718293a4b",
        "ai_response": "We're thrilled you enjoyed it!"
    }))
}

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Start a stub of the review API and return its base URL.
pub async fn spawn_stub_api() -> (String, StubState) {
    let stub = StubState::default();
    let router = Router::new()
        .route("/api/reviews/health", get(stub_health))
        .route("/api/reviews/all", get(stub_list))
        .route("/api/reviews/stats", get(stub_stats))
        .route("/api/reviews/submit", post(stub_submit))
        .with_state(stub.clone());
    let addr = serve(router).await;
    (format!("http://{}", addr), stub)
}

/// A local URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
