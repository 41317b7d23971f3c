mod client;

pub use client::*;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{ListQuery, ReviewPage, ReviewSubmission, Stats, SubmitReceipt};

pub const HEALTH_PATH: &str = "/api/reviews/health";
pub const LIST_PATH: &str = "/api/reviews/all";
pub const STATS_PATH: &str = "/api/reviews/stats";
pub const SUBMIT_PATH: &str = "/api/reviews/submit";

/// The review API as seen by the apps. [`ReviewsClient`] talks HTTP; tests
/// substitute scripted backends.
#[async_trait]
pub trait ReviewsBackend: Send + Sync {
    async fn health(&self) -> ApiResult<()>;

    async fn list_reviews(&self, query: &ListQuery) -> ApiResult<ReviewPage>;

    async fn stats(&self) -> ApiResult<Stats>;

    async fn submit_review(&self, submission: &ReviewSubmission) -> ApiResult<SubmitReceipt>;
}
