// Application state module
// Per-site runtime state shared by every connection of one listener

use std::sync::atomic::AtomicUsize;

use tokio_util::task::TaskTracker;

use super::site::Site;
use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub site: Site,
    /// Connections currently being served by this site
    pub active_connections: AtomicUsize,
    /// Connection tasks, awaited on shutdown
    pub connections: TaskTracker,
}

impl AppState {
    pub fn new(config: Config, site: Site) -> Self {
        Self {
            config,
            site,
            active_connections: AtomicUsize::new(0),
            connections: TaskTracker::new(),
        }
    }
}
