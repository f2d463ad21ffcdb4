use crate::store::SidecarStore;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SidecarStore>,
    pub started_at: Instant,
    pub registry: Registry,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            store: Arc::new(SidecarStore::new()),
            started_at: Instant::now(),
            registry,
        }
    }
}
