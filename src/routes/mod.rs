pub mod admin;
pub mod user;

use axum::response::Html;
use serde::{Deserialize, Deserializer};

use crate::models::Rating;

fn page(rendered: Result<String, tera::Error>, name: &str) -> Html<String> {
    match rendered {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::error!("Failed to render {}: {:?}", name, e);
            Html(format!("Template error: {}", name))
        }
    }
}

/// Form fields arrive as strings; an empty or non-numeric value is `None`.
fn number_field<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// Rating filter from a form value. `Err` for values outside 1..=5.
fn parse_filter(value: Option<u8>) -> Result<Option<Rating>, u8> {
    match value {
        None => Ok(None),
        Some(v) => Rating::new(v).map(Some).ok_or(v),
    }
}
