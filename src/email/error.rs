//! Email error types

use thiserror::Error;

/// Errors that can occur when composing or sending an email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Email has no recipient
    #[error("email must have at least one recipient")]
    NoRecipients,

    /// Email has no sender
    #[error("email must have a from address")]
    NoSender,

    /// Email has no subject
    #[error("email must have a subject")]
    NoSubject,

    /// Email has no body content
    #[error("email must have either text or HTML content")]
    NoContent,

    /// Template rendering error
    #[error("failed to render email template: {0}")]
    Template(#[from] askama::Error),

    /// The provider returned a non-success status
    #[error("email provider rejected the send ({status}): {detail}")]
    Provider {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body or provider error detail
        detail: String,
    },

    /// The provider could not be reached or returned a malformed response
    #[error("email transport error: {0}")]
    Transport(String),
}

impl EmailError {
    /// Create a transport error from a string message.
    #[must_use]
    pub fn transport<T: Into<String>>(msg: T) -> Self {
        Self::Transport(msg.into())
    }
}
