use crate::api::ReviewsBackend;
use crate::config::Config;
use crate::health::HealthMonitor;
use crate::sync::Synchronizer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminState {
    pub sync: Arc<Synchronizer>,
    pub health: HealthMonitor,
    pub config: Arc<Config>,
}

#[derive(Clone)]
pub struct UserState {
    pub backend: Arc<dyn ReviewsBackend>,
    pub health: HealthMonitor,
    pub config: Arc<Config>,
}
