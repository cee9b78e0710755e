//! Console backend for development.
//!
//! Logs emails instead of sending them, so the service can run without
//! provider credentials.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::email::{Email, EmailError, EmailSender, MessageId};

/// Log-only email backend.
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend {
    verbose: bool,
}

impl ConsoleBackend {
    /// Create a new console backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console backend that also logs full message bodies.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl EmailSender for ConsoleBackend {
    async fn send(&self, email: Email) -> Result<MessageId, EmailError> {
        email.validate()?;

        let from = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let subject = email.subject.as_deref().ok_or(EmailError::NoSubject)?;

        info!(
            from = %from.email,
            to = ?email.to.iter().map(|m| m.email.as_str()).collect::<Vec<_>>(),
            subject = %subject,
            "console email sent"
        );

        if self.verbose {
            if let Some(html) = &email.html {
                debug!(html = %html, "email HTML content");
            }
            if let Some(text) = &email.text {
                debug!(text = %text, "email text content");
            }
        }

        Ok(MessageId::new(format!("console-{}", uuid::Uuid::new_v4())))
    }
}
