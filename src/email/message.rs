//! Email message type with a fluent builder.

use serde::{Deserialize, Serialize};

use super::EmailError;

/// A named email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// The address itself
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
}

impl Mailbox {
    /// Create a mailbox from a bare address.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// An outbound email message.
///
/// ```rust
/// use quotefeed::email::{Email, Mailbox};
///
/// let email = Email::new()
///     .from(Mailbox::new("noreply@quotefeed.app").with_name("Quotefeed"))
///     .to(Mailbox::new("reader@example.com"))
///     .subject("Hello!")
///     .html("<h1>Hello!</h1>");
/// assert!(email.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    /// Recipients (To)
    pub to: Vec<Mailbox>,

    /// Sender (From)
    pub from: Option<Mailbox>,

    /// Subject line
    pub subject: Option<String>,

    /// HTML body
    pub html: Option<String>,

    /// Plain text body
    pub text: Option<String>,
}

impl Email {
    /// Create a new empty email.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient.
    #[must_use]
    pub fn to(mut self, mailbox: Mailbox) -> Self {
        self.to.push(mailbox);
        self
    }

    /// Set the sender.
    #[must_use]
    pub fn from(mut self, mailbox: Mailbox) -> Self {
        self.from = Some(mailbox);
        self
    }

    /// Set the subject line.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the HTML body.
    #[must_use]
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html = Some(body.into());
        self
    }

    /// Set the plain text body.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Check that all required fields are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the email has no recipient, no sender, no subject,
    /// or no body content.
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.to.is_empty() {
            return Err(EmailError::NoRecipients);
        }
        if self.from.is_none() {
            return Err(EmailError::NoSender);
        }
        if self.subject.is_none() {
            return Err(EmailError::NoSubject);
        }
        if self.html.is_none() && self.text.is_none() {
            return Err(EmailError::NoContent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_email() -> Email {
        Email::new()
            .from(Mailbox::new("noreply@quotefeed.app"))
            .to(Mailbox::new("reader@example.com"))
            .subject("Test")
            .html("<p>Hello</p>")
    }

    #[test]
    fn builder_sets_fields() {
        let email = base_email();
        assert_eq!(email.to.len(), 1);
        assert_eq!(email.to[0].email, "reader@example.com");
        assert_eq!(email.subject.as_deref(), Some("Test"));
        assert!(email.validate().is_ok());
    }

    #[test]
    fn validation_requires_recipient() {
        let email = Email::new()
            .from(Mailbox::new("noreply@quotefeed.app"))
            .subject("Test")
            .html("<p>Hello</p>");
        assert!(matches!(email.validate(), Err(EmailError::NoRecipients)));
    }

    #[test]
    fn validation_requires_sender() {
        let email = Email::new()
            .to(Mailbox::new("reader@example.com"))
            .subject("Test")
            .html("<p>Hello</p>");
        assert!(matches!(email.validate(), Err(EmailError::NoSender)));
    }

    #[test]
    fn validation_requires_subject() {
        let email = Email::new()
            .from(Mailbox::new("noreply@quotefeed.app"))
            .to(Mailbox::new("reader@example.com"))
            .html("<p>Hello</p>");
        assert!(matches!(email.validate(), Err(EmailError::NoSubject)));
    }

    #[test]
    fn validation_requires_content() {
        let email = Email::new()
            .from(Mailbox::new("noreply@quotefeed.app"))
            .to(Mailbox::new("reader@example.com"))
            .subject("Test");
        assert!(matches!(email.validate(), Err(EmailError::NoContent)));
    }

    #[test]
    fn text_only_body_is_valid() {
        let email = Email::new()
            .from(Mailbox::new("noreply@quotefeed.app"))
            .to(Mailbox::new("reader@example.com"))
            .subject("Test")
            .text("plain");
        assert!(email.validate().is_ok());
    }

    #[test]
    fn mailbox_with_name() {
        let mailbox = Mailbox::new("reader@example.com").with_name("Reader");
        assert_eq!(mailbox.name.as_deref(), Some("Reader"));
    }
}
