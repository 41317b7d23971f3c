//! Presentation: view models built from app state, laid out by the tera
//! templates. Nothing here holds state or talks to the network.

pub mod dashboard;
pub mod feedback;
pub mod time;

use serde::Serialize;
use tera::Context;

use crate::health::ApiStatus;

pub use dashboard::{dashboard_view, DashboardView};
pub use feedback::{user_page_view, UserPageView};

pub const ADMIN_OFFLINE_MESSAGE: &str =
    "Unable to connect to server. Please check if the backend is running.";
pub const USER_OFFLINE_MESSAGE: &str = "Unable to connect to server. Please check your connection.";
pub const CHECKING_MESSAGE: &str = "Connecting to server...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub tone: Tone,
    pub message: String,
    pub spinner: bool,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            message: message.into(),
            spinner: false,
        }
    }
}

/// Connectivity banner: informational while checking, an error when the
/// API is offline, nothing once it is online.
pub fn status_banner(status: ApiStatus, offline_message: &str) -> Option<Banner> {
    match status {
        ApiStatus::Checking => Some(Banner {
            tone: Tone::Info,
            message: CHECKING_MESSAGE.to_string(),
            spinner: true,
        }),
        ApiStatus::Offline => Some(Banner::error(offline_message)),
        ApiStatus::Online => None,
    }
}

pub fn render_dashboard(view: &DashboardView) -> Result<String, tera::Error> {
    render("dashboard.html", view)
}

pub fn render_user_page(view: &UserPageView) -> Result<String, tera::Error> {
    render("feedback.html", view)
}

fn render<T: Serialize>(name: &str, view: &T) -> Result<String, tera::Error> {
    let ctx = Context::from_serialize(view)?;
    crate::templates::get_tera().render(name, &ctx)
}
