//! One-shot backend health probe backing the connectivity banner.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::ReviewsBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Checking,
    Online,
    Offline,
}

impl ApiStatus {
    pub fn is_resolved(self) -> bool {
        self != ApiStatus::Checking
    }
}

/// Holds the app's [`ApiStatus`]. Starts as `Checking`; the first probe
/// resolves it and it never goes back.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    tx: Arc<watch::Sender<ApiStatus>>,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthMonitor {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ApiStatus::Checking);
        Self { tx: Arc::new(tx) }
    }

    pub fn status(&self) -> ApiStatus {
        *self.tx.borrow()
    }

    /// Issue one health request and record the outcome.
    pub async fn probe(&self, backend: &dyn ReviewsBackend) -> ApiStatus {
        let status = match backend.health().await {
            Ok(()) => ApiStatus::Online,
            Err(e) => {
                warn!("Backend health probe failed: {}", e);
                ApiStatus::Offline
            }
        };
        self.tx.send_replace(status);
        info!(status = ?status, "API status resolved");
        status
    }

    /// Run a single probe in the background. Called once at startup.
    pub fn spawn(&self, backend: Arc<dyn ReviewsBackend>) -> JoinHandle<ApiStatus> {
        let monitor = self.clone();
        tokio::spawn(async move { monitor.probe(backend.as_ref()).await })
    }
}
