//! Email sender trait abstraction.

use std::fmt;

use async_trait::async_trait;

use super::{Email, EmailError};

/// Provider-assigned identifier of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a provider message id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for sending emails, implemented by every backend.
///
/// Returns the provider's message id on success; the id ends up in the
/// newsletter audit log, never in the email body itself.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one email.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the email is invalid or the provider rejects
    /// or fails the send.
    async fn send(&self, email: Email) -> Result<MessageId, EmailError>;
}
