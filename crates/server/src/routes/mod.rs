//! API route handlers for the benchview server.

pub mod devices;
pub mod health;
pub mod jobs;
pub mod stream;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Health check (status, version, uptime, observer count)
/// - GET /api/jobs - Most recent jobs, newest first
/// - GET /api/jobs/:id - Single job record
/// - GET /api/jobs/ws - WebSocket stream of live job events
/// - POST /api/devices/:serial/logcat - Start a device log collection job
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", jobs::router())
        .nest("/api", stream::router())
        .nest("/api", devices::router())
        .with_state(state)
}
