//! HTTP routes and router assembly.

pub mod newsletter;
pub mod welcome;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::health;
use crate::state::AppState;

/// Build the service router.
///
/// The permissive CORS layer answers `OPTIONS` pre-flight requests for every
/// route, matching the open trigger surface the frontend calls.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/newsletter/send",
            get(newsletter::trigger_query).post(newsletter::trigger_json),
        )
        .route("/email/welcome", post(welcome::send_welcome_email))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
