//! The newsletter trigger endpoint.
//!
//! One external trigger (scheduler webhook or a manual test action in the
//! frontend) maps to one batch invocation. Nothing in this service fires a
//! send on its own.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::newsletter::FrequencyBatch;
use crate::state::AppState;
use crate::store::Frequency;

/// Trigger parameters, from the query string (GET) or the JSON body (POST).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerParams {
    /// Restrict the batch to one frequency; absent means daily plus weekly
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Restrict the batch to a single recipient (test sends)
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Trigger response: aggregate counts, plus a per-frequency breakdown for
/// multi-frequency invocations.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    /// Human-readable batch summary
    pub message: String,
    /// Accepted sends
    pub sent: usize,
    /// Failed recipients
    pub failed: usize,
    /// `sent + failed`
    pub total: usize,
    /// Per-frequency breakdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FrequencyBatch>>,
}

/// `GET /newsletter/send?frequency=daily`
pub async fn trigger_query(
    State(state): State<AppState>,
    Query(params): Query<TriggerParams>,
) -> Result<Json<TriggerResponse>, AppError> {
    trigger(state, params).await
}

/// `POST /newsletter/send` with `{ "frequency": ..., "user_id": ... }`
pub async fn trigger_json(
    State(state): State<AppState>,
    Json(params): Json<TriggerParams>,
) -> Result<Json<TriggerResponse>, AppError> {
    trigger(state, params).await
}

async fn trigger(
    state: AppState,
    params: TriggerParams,
) -> Result<Json<TriggerResponse>, AppError> {
    info!(
        frequency = params.frequency.map(Frequency::as_str),
        user_id = params.user_id.as_deref(),
        "newsletter trigger received"
    );

    let report = state
        .pipeline()
        .run(params.frequency, params.user_id.as_deref())
        .await?;

    let message = if report.total == 0 {
        "No users found for newsletter".to_string()
    } else {
        "Newsletter batch complete".to_string()
    };

    Ok(Json(TriggerResponse {
        message,
        sent: report.sent,
        failed: report.failed,
        total: report.total,
        details: report.details,
    }))
}
