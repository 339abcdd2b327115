// crates/server/src/routes/devices.rs
//! Device operation triggers.
//!
//! - POST /devices/{serial}/logcat — start a log collection job for the
//!   device and return the created record; the work continues in the
//!   background and reports through the lifecycle manager

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use benchview_core::Job;

use crate::error::{ApiError, ApiResult};
use crate::producers::logcat;
use crate::state::AppState;

fn valid_serial(serial: &str) -> bool {
    !serial.is_empty()
        && serial.len() <= 64
        && serial
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// POST /api/devices/{serial}/logcat — kick off log collection.
async fn collect_logcat(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
) -> ApiResult<Json<Job>> {
    if !valid_serial(&serial) {
        return Err(ApiError::BadRequest(format!(
            "invalid device serial: {serial:?}"
        )));
    }
    let job = logcat::start(state.jobs.clone(), serial).await?;
    Ok(Json(job))
}

/// Build the devices router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/devices/{serial}/logcat", post(collect_logcat))
}
