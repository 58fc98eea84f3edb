// Application state module
// Shared state handed to every request handler

use std::time::Instant;

use super::types::Config;
use crate::store::SharedStore;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Record store the handlers operate on
    pub store: SharedStore,
    /// Process start, for the liveness probe uptime
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, store: SharedStore) -> Self {
        Self {
            config,
            store,
            started_at: Instant::now(),
        }
    }
}
