//! Fetch lifecycle for the admin dashboard: initial load, manual refresh,
//! filter-driven refetch and periodic auto-refresh, all funnelled through
//! [`Synchronizer::load`].
//!
//! Overlapping loads are never cancelled. Each load takes a sequence token
//! when it starts; a completion commits only if no newer load has started
//! since, so the latest issued load wins regardless of arrival order.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::ReviewsBackend;
use crate::error::ApiError;
use crate::models::{ListQuery, Rating, Review, Stats};

/// Which kind of fetch is in flight. A single enum, so "loading" and
/// "refreshing" can never both be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPhase {
    #[default]
    Idle,
    /// First paint or filter change: the list is replaced wholesale.
    Loading,
    /// Background refresh: current data stays on screen.
    Refreshing,
}

impl FetchPhase {
    pub fn is_loading(self) -> bool {
        self == FetchPhase::Loading
    }

    pub fn is_refreshing(self) -> bool {
        self == FetchPhase::Refreshing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub reviews: Vec<Review>,
    pub stats: Option<Stats>,
    pub phase: FetchPhase,
    pub error: Option<String>,
    pub filter: Option<Rating>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(ApiError),
    /// A newer load started before this one finished; its result was dropped.
    Superseded,
}

struct Shared {
    backend: Arc<dyn ReviewsBackend>,
    state: watch::Sender<DashboardState>,
    /// Token of the most recently started load. Only read or written while
    /// the `state` lock is held, so issuing and committing are atomic with
    /// the state change they accompany.
    latest: AtomicU64,
}

/// A load that has entered its phase and is waiting for its fetch.
struct Ticket {
    token: u64,
    filter: Option<Rating>,
}

impl Shared {
    /// Take a token, enter the fetch phase and clear the error.
    fn begin(&self, show_refreshing: bool) -> Ticket {
        let mut ticket = Ticket {
            token: 0,
            filter: None,
        };
        self.state.send_modify(|s| {
            ticket.token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            s.phase = if show_refreshing {
                FetchPhase::Refreshing
            } else {
                FetchPhase::Loading
            };
            s.error = None;
            ticket.filter = s.filter;
        });
        debug!(token = ticket.token, show_refreshing, rating = ?ticket.filter, "Loading dashboard data");
        ticket
    }

    /// Fetch list and stats, then commit unless a newer load has begun.
    async fn finish(&self, ticket: Ticket) -> LoadOutcome {
        let Ticket { token, filter } = ticket;
        let query = ListQuery::first_page(filter);
        let result = tokio::try_join!(self.backend.list_reviews(&query), self.backend.stats());

        let mut outcome = LoadOutcome::Superseded;
        self.state.send_if_modified(|s| {
            if self.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            match result {
                Ok((page, stats)) => {
                    s.reviews = page.reviews;
                    s.stats = Some(stats);
                    outcome = LoadOutcome::Loaded;
                }
                Err(e) => {
                    s.error = Some(e.message());
                    outcome = LoadOutcome::Failed(e);
                }
            }
            s.phase = FetchPhase::Idle;
            true
        });

        match &outcome {
            LoadOutcome::Loaded => {
                info!(token, rating = ?filter, "Dashboard data loaded");
            }
            LoadOutcome::Failed(e) => warn!(token, "Dashboard load failed: {}", e),
            LoadOutcome::Superseded => debug!(token, "Discarding stale dashboard load"),
        }
        outcome
    }

    async fn load(&self, show_refreshing: bool) -> LoadOutcome {
        let ticket = self.begin(show_refreshing);
        self.finish(ticket).await
    }

    /// Begin now, fetch on a background task.
    fn spawn_load(self: &Arc<Self>, show_refreshing: bool) -> JoinHandle<LoadOutcome> {
        let ticket = self.begin(show_refreshing);
        let shared = Arc::clone(self);
        tokio::spawn(async move { shared.finish(ticket).await })
    }
}

/// Owns the dashboard state and its auto-refresh timer.
///
/// Dropping the synchronizer (or calling [`Synchronizer::unmount`]) stops the
/// timer. Loads already in flight are left to finish.
pub struct Synchronizer {
    shared: Arc<Shared>,
    refresh_interval: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Synchronizer {
    /// The state starts in `Loading` so pages served before the first
    /// load runs show a spinner, not an empty list.
    pub fn new(backend: Arc<dyn ReviewsBackend>, refresh_interval: Duration) -> Self {
        let (state, _rx) = watch::channel(DashboardState {
            phase: FetchPhase::Loading,
            ..DashboardState::default()
        });
        Self {
            shared: Arc::new(Shared {
                backend,
                state,
                latest: AtomicU64::new(0),
            }),
            refresh_interval,
            timer: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        self.shared.state.borrow().clone()
    }

    pub fn filter(&self) -> Option<Rating> {
        self.shared.state.borrow().filter
    }

    /// Fetch the review list (with the current filter) and stats together.
    ///
    /// `show_refreshing` selects the `Refreshing` phase instead of `Loading`.
    /// On failure the error slot is set and previous data is kept.
    pub async fn load(&self, show_refreshing: bool) -> LoadOutcome {
        self.shared.load(show_refreshing).await
    }

    /// Initial load plus starting the auto-refresh timer.
    pub async fn mount(&self) -> LoadOutcome {
        self.arm_timer();
        self.load(false).await
    }

    pub async fn refresh(&self) -> LoadOutcome {
        self.load(true).await
    }

    /// Like [`Synchronizer::load`], but the phase change and error reset
    /// are applied before this returns and the fetch runs on its own task.
    pub fn spawn_load(&self, show_refreshing: bool) -> JoinHandle<LoadOutcome> {
        self.shared.spawn_load(show_refreshing)
    }

    /// Change the rating filter. A changed value re-arms the timer and
    /// triggers exactly one full load; an unchanged value does nothing and
    /// returns `None`.
    pub async fn set_filter(&self, filter: Option<Rating>) -> Option<LoadOutcome> {
        if !self.select_filter(filter) {
            return None;
        }
        Some(self.load(false).await)
    }

    /// Store a new filter and re-arm the timer without fetching. Returns
    /// whether the filter changed; the caller owes exactly one
    /// `load(false)` or `spawn_load(false)` when it did.
    pub fn select_filter(&self, filter: Option<Rating>) -> bool {
        let changed = self.shared.state.send_if_modified(|s| {
            if s.filter == filter {
                return false;
            }
            s.filter = filter;
            true
        });
        if changed {
            info!(rating = ?filter, "Rating filter changed");
            self.arm_timer();
        }
        changed
    }

    /// Stop the auto-refresh timer.
    pub fn unmount(&self) {
        if let Some(handle) = self.lock_timer().take() {
            handle.abort();
            debug!("Auto-refresh timer stopped");
        }
    }

    pub fn timer_active(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Replace any running timer with a fresh one whose first tick is one
    /// full interval away.
    fn arm_timer(&self) {
        let shared = Arc::clone(&self.shared);
        let period = self.refresh_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                shared.spawn_load(true);
            }
        });

        if let Some(previous) = self.lock_timer().replace(handle) {
            previous.abort();
        }
        debug!(interval_secs = period.as_secs(), "Auto-refresh timer armed");
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        self.unmount();
    }
}
