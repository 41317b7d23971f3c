use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::{ReviewsBackend, HEALTH_PATH, LIST_PATH, STATS_PATH, SUBMIT_PATH};
use crate::config::REQUEST_TIMEOUT;
use crate::error::{ApiError, ApiResult};
use crate::models::{ErrorBody, ListQuery, ReviewPage, ReviewSubmission, Stats, SubmitReceipt};

const FETCH_REVIEWS_FAILED: &str = "Failed to fetch reviews";
const FETCH_STATS_FAILED: &str = "Failed to fetch statistics";
const SUBMIT_REJECTED: &str = "Failed to submit review";
const SUBMIT_NOT_SENT: &str = "Failed to submit review. Please try again.";

/// HTTP client for the review feedback API.
#[derive(Clone, Debug)]
pub struct ReviewsClient {
    client: Client,
    base_url: String,
}

impl ReviewsClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Every call through this client fails once `timeout` has elapsed.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                error!("Failed to create HTTP client: {}", e);
                ApiError::RequestFailed("Failed to create HTTP client".to_string())
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ReviewsBackend for ReviewsClient {
    async fn health(&self) -> ApiResult<()> {
        let response = self.client.get(self.url(HEALTH_PATH)).send().await.map_err(|e| {
            warn!("Health check failed: {}", e);
            ApiError::Unreachable
        })?;

        if response.status().is_success() {
            Ok(())
        } else {
            warn!("Health check returned {}", response.status());
            Err(ApiError::Unreachable)
        }
    }

    async fn list_reviews(&self, query: &ListQuery) -> ApiResult<ReviewPage> {
        debug!(limit = query.limit, skip = query.skip, rating = ?query.rating, "GET {}", LIST_PATH);

        let response = self
            .client
            .get(self.url(LIST_PATH))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching reviews: {}", e);
                ApiError::RequestFailed(FETCH_REVIEWS_FAILED.to_string())
            })?;

        read_json(response, FETCH_REVIEWS_FAILED).await
    }

    async fn stats(&self) -> ApiResult<Stats> {
        let response = self.client.get(self.url(STATS_PATH)).send().await.map_err(|e| {
            error!("Error fetching stats: {}", e);
            ApiError::RequestFailed(FETCH_STATS_FAILED.to_string())
        })?;

        read_json(response, FETCH_STATS_FAILED).await
    }

    async fn submit_review(&self, submission: &ReviewSubmission) -> ApiResult<SubmitReceipt> {
        let response = self
            .client
            .post(self.url(SUBMIT_PATH))
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                error!("Error submitting review: {}", e);
                if e.is_builder() {
                    ApiError::RequestFailed(SUBMIT_NOT_SENT.to_string())
                } else {
                    ApiError::NoResponse
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(response, SUBMIT_REJECTED).await);
        }

        response.json::<SubmitReceipt>().await.map_err(|e| {
            error!("Failed to read submit response: {}", e);
            if e.is_timeout() {
                ApiError::NoResponse
            } else {
                ApiError::RequestFailed(SUBMIT_NOT_SENT.to_string())
            }
        })
    }
}

/// Decode a 2xx body, or turn a non-2xx reply into [`ApiError::Rejected`].
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> ApiResult<T> {
    if !response.status().is_success() {
        return Err(rejection(response, fallback).await);
    }

    response.json::<T>().await.map_err(|e| {
        error!("Failed to parse response: {}", e);
        ApiError::RequestFailed(fallback.to_string())
    })
}

async fn rejection(response: Response, fallback: &str) -> ApiError {
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    let message = body.detail_message().unwrap_or_else(|| fallback.to_string());
    warn!("API returned {}: {}", status, message);
    ApiError::Rejected(message)
}
