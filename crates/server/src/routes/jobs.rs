// crates/server/src/routes/jobs.rs
//! Read API for job records.
//!
//! - GET /jobs — most recent jobs, newest first (bounded, non-paginated)
//! - GET /jobs/{id} — single job record, 404 when unknown
//!
//! Clients use these to hydrate on connect (or after a disconnect), then
//! follow live updates via the WebSocket stream.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use benchview_core::Job;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/jobs — the most recent jobs.
async fn list_jobs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Job>>> {
    Ok(Json(state.jobs.list().await?))
}

/// GET /api/jobs/{id} — point lookup.
///
/// The read API is strict where the patch path is lenient: an unknown id
/// here is a 404, not an empty success.
async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    state
        .jobs
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::JobNotFound(id))
}

/// Build the jobs router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/{id}", get(get_job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn app() -> (Router, Arc<AppState>) {
        let db = benchview_db::Database::new_in_memory().await.unwrap();
        let state = AppState::new(db);
        let app = Router::new()
            .nest("/api", router())
            .with_state(state.clone());
        (app, state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn list_jobs_empty() {
        let (app, _state) = app().await;
        let (status, json) = get_json(app, "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn list_jobs_newest_first() {
        let (app, state) = app().await;
        state.jobs.create("scan", "usb_enumerate").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = state
            .jobs
            .create("diagnostic", "android_logcat:ABC123")
            .await
            .unwrap();

        let (status, json) = get_json(app, "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        let jobs = json.as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["id"], second.id.as_str());
        assert_eq!(jobs[0]["type"], "diagnostic");
        assert_eq!(jobs[0]["status"], "queued");
    }

    #[tokio::test]
    async fn get_job_round_trips() {
        let (app, state) = app().await;
        let job = state
            .jobs
            .create("diagnostic", "battery_health:A1")
            .await
            .unwrap();

        let (status, json) = get_json(app, &format!("/api/jobs/{}", job.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], job.id.as_str());
        assert_eq!(json["action"], "battery_health:A1");
    }

    #[tokio::test]
    async fn get_unknown_job_is_404() {
        let (app, _state) = app().await;
        let (status, json) = get_json(app, "/api/jobs/no-such-id").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Job not found");
    }
}
