//! Transactional-email HTTP API backend.
//!
//! Submits messages to a Brevo-compatible endpoint
//! (`POST {base_url}/v3/smtp/email`, authenticated with an `api-key` header)
//! and returns the provider's message id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::email::{Email, EmailError, EmailSender, Mailbox, MessageId};

/// Email backend speaking the Brevo transactional HTTP API.
pub struct BrevoBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BrevoBackend {
    /// Create a backend for the given endpoint and API key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/smtp/email", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

impl<'a> From<&'a Mailbox> for Contact<'a> {
    fn from(mailbox: &'a Mailbox) -> Self {
        Self {
            name: mailbox.name.as_deref(),
            email: &mailbox.email,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    #[serde(rename = "htmlContent", skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
    #[serde(rename = "textContent", skip_serializing_if = "Option::is_none")]
    text_content: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    #[serde(rename = "messageId")]
    message_id: String,
}

#[async_trait]
impl EmailSender for BrevoBackend {
    async fn send(&self, email: Email) -> Result<MessageId, EmailError> {
        email.validate()?;

        let sender = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let subject = email.subject.as_deref().ok_or(EmailError::NoSubject)?;

        let payload = SendEmailRequest {
            sender: sender.into(),
            to: email.to.iter().map(Contact::from).collect(),
            subject,
            html_content: email.html.as_deref(),
            text_content: email.text.as_deref(),
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| EmailError::transport(format!("malformed provider response: {e}")))?;

        Ok(MessageId::new(parsed.message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_payload_shape() {
        let payload = SendEmailRequest {
            sender: Contact {
                name: Some("Quotefeed"),
                email: "noreply@quotefeed.app",
            },
            to: vec![Contact {
                name: None,
                email: "reader@example.com",
            }],
            subject: "Your daily inspiration from Quotefeed",
            html_content: Some("<p>hello</p>"),
            text_content: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["sender"]["email"], "noreply@quotefeed.app");
        assert_eq!(json["to"][0]["email"], "reader@example.com");
        assert_eq!(json["htmlContent"], "<p>hello</p>");
        assert!(json["to"][0].get("name").is_none());
        assert!(json.get("textContent").is_none());
    }

    #[test]
    fn response_parses_message_id() {
        let parsed: SendEmailResponse =
            serde_json::from_str(r#"{"messageId":"<202608.abc@smtp-relay>"}"#).unwrap();
        assert_eq!(parsed.message_id, "<202608.abc@smtp-relay>");
    }

    #[test]
    fn endpoint_normalizes_trailing_slash() {
        let backend = BrevoBackend::new("https://api.brevo.com/", "key");
        assert_eq!(backend.endpoint(), "https://api.brevo.com/v3/smtp/email");
    }
}
