use reviewdesk::api::{ReviewsBackend, ReviewsClient};
use reviewdesk::config::Config;
use reviewdesk::health::HealthMonitor;
use reviewdesk::routes;
use reviewdesk::state::AdminState;
use reviewdesk::sync::Synchronizer;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 5174;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    reviewdesk::init_tracing();

    let config = Arc::new(Config::from_env(DEFAULT_PORT)?);
    let backend: Arc<dyn ReviewsBackend> = Arc::new(ReviewsClient::new(config.api_base_url.clone())?);

    let health = HealthMonitor::new();
    health.spawn(backend.clone());

    let sync = Arc::new(Synchronizer::new(backend, config.refresh_interval));
    {
        let sync = sync.clone();
        tokio::spawn(async move {
            sync.mount().await;
        });
    }

    let state = AdminState {
        sync: sync.clone(),
        health,
        config: config.clone(),
    };

    let app = routes::admin::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!(api = %config.api_base_url, "Admin dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    sync.unmount();
    Ok(())
}
