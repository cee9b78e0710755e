//! Service error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::email::EmailError;
use crate::store::StoreError;

/// Errors that cross the HTTP boundary.
///
/// Per-recipient failures inside a batch never surface here; they are
/// converted into outcome records at the recipient boundary. This type covers
/// batch-fatal conditions and the single-recipient welcome-email operation.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store failure outside any recipient's pipeline (e.g. resolver query)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Email failure in a single-recipient operation
    #[error(transparent)]
    Email(#[from] EmailError),

    /// No profile exists for the requested user
    #[error("no profile found for user {0}")]
    ProfileNotFound(String),

    /// The user has no email address on record
    #[error("no email address on record for user {0}")]
    NoEmail(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Email(_) | Self::NoEmail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error!(%self, "request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_not_found_maps_to_404() {
        let response = AppError::ProfileNotFound("u1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_map_to_500() {
        let response =
            AppError::Store(StoreError::Connectivity("refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
