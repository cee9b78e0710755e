//! Liveness and readiness probes.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// Readiness probe payload.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Always `"ok"` when the handler answers
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Liveness probe: the process is running.
#[allow(clippy::unused_async)]
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: the service can accept trigger requests.
#[allow(clippy::unused_async)]
pub async fn readiness() -> impl IntoResponse {
    Json(ReadinessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
