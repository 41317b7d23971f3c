use chrono::{DateTime, Utc};
use serde::Serialize;

use super::time::relative_time;
use super::{status_banner, Banner, ADMIN_OFFLINE_MESSAGE};
use crate::health::ApiStatus;
use crate::models::{Rating, Review, Stats};
use crate::sync::DashboardState;

/// Seconds before the page reloads itself while a fetch or probe is pending.
const BUSY_RELOAD_SECS: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTile {
    pub title: &'static str,
    pub value: String,
    pub subtitle: Option<&'static str>,
    pub accent: &'static str,
}

pub fn stat_tiles(stats: &Stats) -> Vec<StatTile> {
    vec![
        StatTile {
            title: "Total Reviews",
            value: stats.total_reviews.to_string(),
            subtitle: None,
            accent: "blue",
        },
        StatTile {
            title: "Average Rating",
            value: format!("{:.1}", stats.average_rating),
            subtitle: Some("out of 5.0"),
            accent: "amber",
        },
        StatTile {
            title: "Most Common",
            value: stats
                .most_common_rating()
                .map_or_else(|| "N/A".to_string(), |r| r.to_string()),
            subtitle: Some("star rating"),
            accent: "green",
        },
        StatTile {
            title: "Last 24 Hours",
            value: stats.recent_count_24h.to_string(),
            subtitle: Some("new reviews"),
            accent: "violet",
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCard {
    pub key: String,
    pub short_id: String,
    pub relative_time: String,
    pub rating: u8,
    /// Colour class; unrated records borrow the neutral 3-star style.
    pub badge_class: u8,
    pub badge_label: String,
    pub review_text: String,
    pub ai_summary: String,
    pub suggested_actions: Vec<String>,
}

fn stars_label(n: u8) -> String {
    if n == 1 {
        "1 Star".to_string()
    } else {
        format!("{} Stars", n)
    }
}

pub fn review_card(review: &Review, now: DateTime<Utc>) -> ReviewCard {
    let fallback = |s: &str, default: &str| {
        if s.trim().is_empty() {
            default.to_string()
        } else {
            s.to_string()
        }
    };

    ReviewCard {
        key: review.id.to_string(),
        short_id: review.id.short().to_string(),
        relative_time: relative_time(&review.timestamp, now),
        rating: review.rating,
        badge_class: if review.rating == 0 { 3 } else { review.rating },
        badge_label: stars_label(review.rating),
        review_text: fallback(&review.review_text, "No review text provided"),
        ai_summary: fallback(&review.ai_summary, "Summary not available"),
        suggested_actions: review.suggested_actions.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: u8,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterBar {
    pub options: Vec<FilterOption>,
    pub all_selected: bool,
    pub show_reset: bool,
}

pub fn filter_bar(filter: Option<Rating>) -> FilterBar {
    let options = Rating::all_desc()
        .map(|r| FilterOption {
            value: r.get(),
            label: format!("{} ({})", "\u{2b50}".repeat(r.get() as usize), stars_label(r.get())),
            selected: filter == Some(r),
        })
        .collect();

    FilterBar {
        options,
        all_selected: filter.is_none(),
        show_reset: filter.is_some(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

pub fn empty_state(filter: Option<Rating>) -> EmptyState {
    match filter {
        Some(r) => EmptyState {
            message: format!("No {}-star reviews yet", r),
            subtitle: "Try selecting a different rating filter".to_string(),
        },
        None => EmptyState {
            message: "No reviews yet".to_string(),
            subtitle: "Reviews will appear here once customers submit them".to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub banner: Option<Banner>,
    pub stats_loading: bool,
    pub tiles: Vec<StatTile>,
    pub filter: FilterBar,
    pub title: String,
    pub count_label: Option<String>,
    pub error: Option<String>,
    pub show_spinner: bool,
    pub refreshing: bool,
    pub cards: Vec<ReviewCard>,
    pub empty: Option<EmptyState>,
    pub reload_after_secs: u64,
}

/// Build the dashboard page from the health status and a state snapshot.
/// Relative times are computed against `now` on every call.
pub fn dashboard_view(
    status: ApiStatus,
    state: &DashboardState,
    refresh_every_secs: u64,
    now: DateTime<Utc>,
) -> DashboardView {
    let loading = state.phase.is_loading();
    let refreshing = state.phase.is_refreshing();
    let count = state.reviews.len();

    let tiles = stat_tiles(state.stats.as_ref().unwrap_or(&Stats::default()));
    let cards = if loading {
        Vec::new()
    } else {
        state.reviews.iter().map(|r| review_card(r, now)).collect()
    };
    let empty = (!loading && count == 0 && state.error.is_none()).then(|| empty_state(state.filter));

    let busy = loading || refreshing || !status.is_resolved();

    DashboardView {
        banner: status_banner(status, ADMIN_OFFLINE_MESSAGE),
        stats_loading: loading && state.stats.is_none(),
        tiles,
        filter: filter_bar(state.filter),
        title: match state.filter {
            Some(r) => format!("{}-Star Reviews", r),
            None => "All Reviews".to_string(),
        },
        count_label: (count > 0).then(|| {
            if count == 1 {
                "1 Review".to_string()
            } else {
                format!("{} Reviews", count)
            }
        }),
        error: state.error.clone(),
        show_spinner: loading,
        refreshing,
        cards,
        empty,
        reload_after_secs: if busy { BUSY_RELOAD_SECS } else { refresh_every_secs },
    }
}
