use reviewdesk::api::{ReviewsBackend, ReviewsClient};
use reviewdesk::config::Config;
use reviewdesk::health::HealthMonitor;
use reviewdesk::routes;
use reviewdesk::state::UserState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 5173;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    reviewdesk::init_tracing();

    let config = Arc::new(Config::from_env(DEFAULT_PORT)?);
    let backend: Arc<dyn ReviewsBackend> = Arc::new(ReviewsClient::new(config.api_base_url.clone())?);

    let health = HealthMonitor::new();
    health.spawn(backend.clone());

    let state = UserState {
        backend,
        health,
        config: config.clone(),
    };

    let app = routes::user::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!(api = %config.api_base_url, "Feedback form listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
