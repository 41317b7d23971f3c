use serde::Serialize;

use super::{status_banner, Banner, USER_OFFLINE_MESSAGE};
use crate::form::star::{label_for, StarPicker};
use crate::form::{Field, ReviewForm, ScrollEffect, UserView, MAX_REVIEW_CHARS};
use crate::health::ApiStatus;
use crate::models::{MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarView {
    pub value: u8,
    pub filled: bool,
    pub checked: bool,
    pub aria_label: String,
    /// Rating text the control shows once this star is picked.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub stars: Vec<StarView>,
    pub rating_label: String,
    pub rating_error: Option<String>,
    pub review_text: String,
    pub text_error: Option<String>,
    pub char_count: usize,
    pub max_chars: usize,
    pub submit_error: Option<String>,
    pub submitting: bool,
}

pub fn form_view(form: &ReviewForm) -> FormView {
    let picker = StarPicker::new(form.rating, form.is_submitting());
    let stars = (MIN_RATING..=MAX_RATING)
        .map(|star| StarView {
            value: star,
            filled: picker.is_filled(star),
            checked: picker.rating() == star,
            aria_label: if star == 1 {
                "1 star".to_string()
            } else {
                format!("{} stars", star)
            },
            label: label_for(star),
        })
        .collect();

    FormView {
        stars,
        rating_label: picker.label(),
        rating_error: form.errors.get(&Field::Rating).cloned(),
        review_text: form.review_text.clone(),
        text_error: form.errors.get(&Field::ReviewText).cloned(),
        char_count: form.char_count(),
        max_chars: MAX_REVIEW_CHARS,
        submit_error: form.submit_error.clone(),
        submitting: form.is_submitting(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsePanel {
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPageView {
    pub banner: Option<Banner>,
    pub form: Option<FormView>,
    pub response: Option<ResponsePanel>,
    pub scroll: Option<ScrollEffect>,
    /// Set while the health probe is pending so the banner resolves.
    pub reload_after_secs: Option<u64>,
}

pub fn user_page_view(status: ApiStatus, view: &UserView, scroll: Option<ScrollEffect>) -> UserPageView {
    let (form, response) = match view {
        UserView::Form(form) => (Some(form_view(form)), None),
        UserView::Response(resp) => (
            None,
            Some(ResponsePanel {
                title: "Thank you for your feedback!",
                message: resp.message.clone(),
            }),
        ),
    };

    UserPageView {
        banner: status_banner(status, USER_OFFLINE_MESSAGE),
        form,
        response,
        scroll,
        reload_after_secs: (!status.is_resolved() && matches!(view, UserView::Form(f) if f.review_text.is_empty()))
            .then_some(1),
    }
}
