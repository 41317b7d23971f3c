//! Review submission: field validation, the submit state machine, and the
//! form/response view switch of the user app.

pub mod star;

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

use self::star::StarPicker;
use crate::api::ReviewsBackend;
use crate::models::{Rating, ReviewSubmission};

pub const MIN_REVIEW_CHARS: usize = 10;
pub const MAX_REVIEW_CHARS: usize = 5000;

/// Delay before scrolling to a freshly shown response, so it has mounted.
pub const SCROLL_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Rating,
    ReviewText,
}

pub type FieldErrors = BTreeMap<Field, String>;

/// Check the form fields. An empty map means the form may be submitted.
///
/// The minimum length applies to the trimmed text, the maximum to the raw
/// text. Lengths count characters, not bytes.
pub fn validate(rating: u8, review_text: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if Rating::new(rating).is_none() {
        errors.insert(Field::Rating, "Please select a rating".to_string());
    }

    let trimmed = review_text.trim();
    if trimmed.is_empty() {
        errors.insert(Field::ReviewText, "Please write a review".to_string());
    } else if trimmed.chars().count() < MIN_REVIEW_CHARS {
        errors.insert(
            Field::ReviewText,
            format!("Review must be at least {} characters", MIN_REVIEW_CHARS),
        );
    } else if review_text.chars().count() > MAX_REVIEW_CHARS {
        errors.insert(
            Field::ReviewText,
            format!("Review must not exceed {} characters", MAX_REVIEW_CHARS),
        );
    }

    errors
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    /// A submission was already in flight.
    Busy,
    Accepted { ai_response: String },
    Failed { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub rating: u8,
    pub review_text: String,
    pub phase: FormPhase,
    pub errors: FieldErrors,
    /// Submission-level failure, kept apart from field errors.
    pub submit_error: Option<String>,
}

impl ReviewForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(rating: u8, review_text: impl Into<String>) -> Self {
        Self {
            rating,
            review_text: review_text.into(),
            ..Self::default()
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn char_count(&self) -> usize {
        self.review_text.chars().count()
    }

    /// Commit a star. Out-of-range values and clicks while submitting are
    /// ignored.
    pub fn set_rating(&mut self, rating: u8) {
        let mut picker = StarPicker::new(self.rating, self.is_submitting());
        if let Some(rating) = picker.click(rating) {
            self.rating = rating;
            self.errors.remove(&Field::Rating);
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.review_text = text.into();
        self.errors.remove(&Field::ReviewText);
    }

    /// Run validation, store its errors, and report whether the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(self.rating, &self.review_text);
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and, if valid, post the review.
    ///
    /// On success the fields are cleared. On failure they are kept so the
    /// user can retry, and `submit_error` carries the message.
    pub async fn submit(&mut self, backend: &dyn ReviewsBackend) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Busy;
        }
        if !self.validate() {
            self.phase = FormPhase::Editing;
            return SubmitOutcome::Invalid;
        }
        let Some(rating) = Rating::new(self.rating) else {
            return SubmitOutcome::Invalid;
        };

        self.phase = FormPhase::Submitting;
        self.errors.clear();
        self.submit_error = None;

        let submission = ReviewSubmission {
            rating,
            review_text: self.review_text.clone(),
        };
        let result = backend.submit_review(&submission).await;

        match result {
            Ok(receipt) => {
                info!(
                    rating = rating.get(),
                    submission_id = receipt.submission_id.as_deref().unwrap_or("-"),
                    "Review submitted"
                );
                self.reset();
                self.phase = FormPhase::Success;
                SubmitOutcome::Accepted {
                    ai_response: receipt.ai_response,
                }
            }
            Err(e) => {
                warn!("Review submission failed: {}", e);
                let message = e.message();
                self.submit_error = Some(message.clone());
                self.phase = FormPhase::Error;
                SubmitOutcome::Failed { message }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollEffect {
    ToBottom { delay_ms: u64 },
    ToTop,
}

/// The AI reply to an accepted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseView {
    pub message: String,
}

/// What the user app shows: the form, or the response to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserView {
    Form(ReviewForm),
    Response(ResponseView),
}

impl Default for UserView {
    fn default() -> Self {
        UserView::Form(ReviewForm::new())
    }
}

impl UserView {
    /// Submit `form` and pick the next view. A failed submission stays on
    /// the form with its values and error intact.
    pub async fn submit(
        mut form: ReviewForm,
        backend: &dyn ReviewsBackend,
    ) -> (UserView, Option<ScrollEffect>) {
        match form.submit(backend).await {
            SubmitOutcome::Accepted { ai_response } => (
                UserView::Response(ResponseView {
                    message: ai_response,
                }),
                Some(ScrollEffect::ToBottom {
                    delay_ms: SCROLL_DELAY.as_millis() as u64,
                }),
            ),
            SubmitOutcome::Invalid | SubmitOutcome::Busy | SubmitOutcome::Failed { .. } => {
                (UserView::Form(form), None)
            }
        }
    }

    /// Close the response panel: blank form, scrolled to the top.
    pub fn dismiss() -> (UserView, ScrollEffect) {
        (UserView::Form(ReviewForm::new()), ScrollEffect::ToTop)
    }
}
