//! Customer review form and admin dashboard over the review feedback API.
//!
//! Both apps are thin presentation layers: the API stores reviews and
//! generates the AI summaries. What lives here is the fetch lifecycle
//! ([`health`], [`sync`]), the submission flow ([`form`]) and rendering.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod health;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;
pub mod sync;
mod templates;

pub use error::{ApiError, ApiResult};

/// Install the fmt subscriber used by both binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reviewdesk=info,tower_http=info".into()),
        )
        .init();
}
