//! The one-time welcome email endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::email::{Email, Mailbox};
use crate::error::AppError;
use crate::newsletter::{compose_welcome, WELCOME_SUBJECT};
use crate::state::AppState;

/// Request body: the user to welcome.
#[derive(Debug, Deserialize)]
pub struct WelcomeRequest {
    /// User id of the new account
    pub user_id: String,
}

/// Response body.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// What happened
    pub message: String,
    /// Provider message id when an email actually went out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// `POST /email/welcome` with `{ "user_id": ... }`
///
/// Sends the onboarding email once per account: if the profile's
/// `welcome_email_sent` flag is already set, responds without sending. On a
/// successful send the flag is flipped so a re-trigger stays a no-op.
pub async fn send_welcome_email(
    State(state): State<AppState>,
    Json(request): Json<WelcomeRequest>,
) -> Result<Json<WelcomeResponse>, AppError> {
    let profile = state
        .profiles
        .profile(&request.user_id)
        .await?
        .ok_or_else(|| AppError::ProfileNotFound(request.user_id.clone()))?;

    if profile.welcome_email_sent {
        return Ok(Json(WelcomeResponse {
            message: "Welcome email already sent".to_string(),
            message_id: None,
        }));
    }

    let identity = state
        .identity
        .lookup(&request.user_id)
        .await?
        .filter(|identity| !identity.email.is_empty())
        .ok_or_else(|| AppError::NoEmail(request.user_id.clone()))?;

    // Fall back to the address local part, like the signup flow does for
    // accounts without a display name.
    let display_name = profile
        .name
        .clone()
        .or_else(|| identity.name.clone())
        .unwrap_or_else(|| {
            identity
                .email
                .split('@')
                .next()
                .unwrap_or("there")
                .to_string()
        });

    let html = compose_welcome(&display_name, &state.config.app_base_url)?;
    let email = Email::new()
        .from(state.config.sender_mailbox())
        .to(Mailbox::new(identity.email.clone()).with_name(display_name))
        .subject(WELCOME_SUBJECT)
        .html(html);

    let message_id = state.email.send(email).await?;
    info!(user_id = %request.user_id, %message_id, "welcome email sent");

    if let Err(error) = state.profiles.mark_welcome_sent(&request.user_id).await {
        warn!(user_id = %request.user_id, %error, "failed to mark welcome email as sent");
    }

    Ok(Json(WelcomeResponse {
        message: "Welcome email sent".to_string(),
        message_id: Some(message_id.to_string()),
    }))
}
