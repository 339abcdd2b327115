// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use benchview_db::Database;

use crate::jobs::{JobHub, JobManager};

/// Shared application state accessible from all route handlers.
///
/// The store and hub are plain constructed objects owned here, not
/// process-wide singletons, so tests build isolated instances freely.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Job store handle.
    pub db: Database,
    /// Fan-out hub for live job events.
    pub hub: Arc<JobHub>,
    /// Lifecycle manager: the producers' API surface.
    pub jobs: Arc<JobManager>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(db: Database) -> Arc<Self> {
        let hub = Arc::new(JobHub::new());
        let jobs = Arc::new(JobManager::new(db.clone(), hub.clone()));
        Arc::new(Self {
            start_time: Instant::now(),
            db,
            hub,
            jobs,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
