use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use super::{number_field, page, parse_filter};
use crate::render::{dashboard_view, render_dashboard};
use crate::state::AdminState;

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/refresh", post(refresh))
        .route("/filter", post(filter))
        .route("/api/state", get(api_state))
        .with_state(state)
}

pub async fn dashboard(State(state): State<AdminState>) -> Html<String> {
    let snapshot = state.sync.snapshot();
    let view = dashboard_view(
        state.health.status(),
        &snapshot,
        state.config.refresh_interval.as_secs(),
        chrono::Utc::now(),
    );
    page(render_dashboard(&view), "dashboard.html")
}

pub async fn refresh(State(state): State<AdminState>) -> impl IntoResponse {
    state.sync.spawn_load(true);
    Redirect::to("/")
}

#[derive(Deserialize)]
pub struct FilterForm {
    #[serde(default, deserialize_with = "number_field")]
    rating: Option<u8>,
}

pub async fn filter(State(state): State<AdminState>, Form(form): Form<FilterForm>) -> impl IntoResponse {
    let filter = match parse_filter(form.rating) {
        Ok(filter) => filter,
        Err(v) => {
            tracing::warn!("Ignoring out-of-range rating filter {}", v);
            return Redirect::to("/");
        }
    };

    if state.sync.select_filter(filter) {
        state.sync.spawn_load(false);
    }
    Redirect::to("/")
}

pub async fn api_state(State(state): State<AdminState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "api_status": state.health.status(),
        "dashboard": state.sync.snapshot(),
    }))
}
