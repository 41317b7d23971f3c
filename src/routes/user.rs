use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use super::{number_field, page};
use crate::form::{ReviewForm, UserView};
use crate::render::{render_user_page, user_page_view};
use crate::state::UserState;

pub fn router(state: UserState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/submit", post(submit))
        .route("/dismiss", get(dismiss))
        .route("/api/status", get(api_status))
        .with_state(state)
}

pub async fn index(State(state): State<UserState>) -> Html<String> {
    let view = user_page_view(state.health.status(), &UserView::default(), None);
    page(render_user_page(&view), "feedback.html")
}

#[derive(Deserialize)]
pub struct SubmitForm {
    #[serde(default, deserialize_with = "number_field")]
    rating: Option<u8>,
    #[serde(default)]
    review_text: String,
}

pub async fn submit(State(state): State<UserState>, Form(input): Form<SubmitForm>) -> Html<String> {
    // Browsers send textarea line breaks as CRLF.
    let text = input.review_text.replace("\r\n", "\n");
    let mut form = ReviewForm::new();
    if let Some(rating) = input.rating {
        form.set_rating(rating);
    }
    form.set_text(text);

    let (view, scroll) = UserView::submit(form, state.backend.as_ref()).await;
    let page_view = user_page_view(state.health.status(), &view, scroll);
    page(render_user_page(&page_view), "feedback.html")
}

pub async fn dismiss(State(state): State<UserState>) -> Html<String> {
    let (view, scroll) = UserView::dismiss();
    let page_view = user_page_view(state.health.status(), &view, Some(scroll));
    page(render_user_page(&page_view), "feedback.html")
}

pub async fn api_status(State(state): State<UserState>) -> impl IntoResponse {
    Json(serde_json::json!({ "status": state.health.status() }))
}
