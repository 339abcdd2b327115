// crates/server/src/lib.rs
//! Benchview server library.
//!
//! This crate provides the Axum-based HTTP server for the benchview job
//! tracker: a REST API for listing job records plus a WebSocket stream of
//! live job events.

pub mod error;
pub mod jobs;
pub mod producers;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, jobs, live stream, device triggers)
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = benchview_db::Database::new_in_memory()
            .await
            .expect("in-memory DB");
        create_app(AppState::new(db))
    }

    /// Helper to make a GET request to the app.
    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_app().await;
        let (status, body) = get(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert!(json["uptime_secs"].is_number());
        assert_eq!(json["observers"], 0);
    }

    #[tokio::test]
    async fn jobs_endpoint_starts_empty() {
        let app = test_app().await;
        let (status, body) = get(app, "/api/jobs").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json.is_array());
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_job_is_404_with_error_body() {
        let app = test_app().await;
        let (status, body) = get(app, "/api/jobs/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_app().await;
        let (status, _body) = get(app, "/api/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allow_origin = response.headers().get("access-control-allow-origin");
        assert!(allow_origin.is_some());
        assert_eq!(allow_origin.unwrap(), "*");
    }

    #[tokio::test]
    async fn full_lifecycle_is_visible_through_the_read_api() {
        let db = benchview_db::Database::new_in_memory().await.unwrap();
        let state = AppState::new(db);
        let app = create_app(state.clone());

        let job = state
            .jobs
            .create("diagnostic", "android_logcat:ABC123")
            .await
            .unwrap();
        state
            .jobs
            .patch(
                &job.id,
                benchview_core::JobPatch::new()
                    .status(benchview_core::JobStatus::Completed)
                    .progress(100),
            )
            .await
            .unwrap();

        let (status, body) = get(app, &format!("/api/jobs/{}", job.id)).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["progress"], 100);
    }
}
