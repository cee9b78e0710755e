//! Per-recipient delivery: identity lookup, send, and audit logging.
//!
//! Every step that can fail is caught at the recipient boundary and converted
//! into a [`DeliveryOutcome`]; nothing here returns `Err` to the batch.

use serde_json::json;
use tracing::{info, warn};

use crate::email::{Email, Mailbox, MessageId};
use crate::store::{DeliveryStatus, NewsletterLogEntry, Quote, RecipientProfile};

use super::batch::NewsletterPipeline;
use super::{compose_newsletter, newsletter_subject, select_quotes};

/// The settled result of one recipient's pipeline.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    /// The provider accepted the email
    Sent {
        /// Recipient user id
        user_id: String,
        /// Provider message id, also recorded in the log entry
        message_id: MessageId,
    },
    /// The recipient could not be delivered to
    Failed {
        /// Recipient user id
        user_id: String,
        /// Why delivery failed, also recorded in the log entry
        reason: String,
    },
}

impl DeliveryOutcome {
    /// True for accepted sends.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// The recipient this outcome belongs to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::Sent { user_id, .. } | Self::Failed { user_id, .. } => user_id,
        }
    }
}

fn content_snapshot(quotes: &[Quote], message_id: &MessageId) -> serde_json::Value {
    json!({
        "quotes": quotes
            .iter()
            .map(|q| json!({ "id": q.id, "quote_text": q.text, "author": q.author }))
            .collect::<Vec<_>>(),
        "email_id": message_id.as_str(),
    })
}

impl NewsletterPipeline {
    /// Process one recipient end to end: select quotes, resolve the email
    /// address, compose, send, and write exactly one log entry.
    pub(crate) async fn deliver(&self, profile: &RecipientProfile) -> DeliveryOutcome {
        let selection = match select_quotes(self.quotes.as_ref(), &profile.user_id).await {
            Ok(selection) => selection,
            Err(error) => {
                return self
                    .fail(profile, format!("quote selection failed: {error}"))
                    .await;
            }
        };

        let identity = match self.identity.lookup(&profile.user_id).await {
            Ok(Some(identity)) if !identity.email.is_empty() => identity,
            Ok(_) => return self.fail(profile, "no email found".to_string()).await,
            Err(error) => {
                warn!(user_id = %profile.user_id, %error, "identity lookup failed");
                return self.fail(profile, "no email found".to_string()).await;
            }
        };

        let display_name = profile
            .name
            .clone()
            .or_else(|| identity.name.clone())
            .unwrap_or_else(|| "Reader".to_string());

        let html = match compose_newsletter(
            &display_name,
            &selection,
            profile.newsletter_frequency,
            &self.app_base_url,
        ) {
            Ok(html) => html,
            Err(error) => {
                return self
                    .fail(profile, format!("email composition failed: {error}"))
                    .await;
            }
        };

        let email = Email::new()
            .from(self.sender.clone())
            .to(Mailbox::new(identity.email.clone()).with_name(display_name))
            .subject(newsletter_subject(profile.newsletter_frequency))
            .html(html);

        match self.email.send(email).await {
            Ok(message_id) => {
                self.record(NewsletterLogEntry {
                    user_id: profile.user_id.clone(),
                    frequency: profile.newsletter_frequency,
                    content: content_snapshot(&selection.quotes, &message_id),
                    status: DeliveryStatus::Sent,
                })
                .await;

                info!(
                    user_id = %profile.user_id,
                    email = %identity.email,
                    message_id = %message_id,
                    "newsletter sent"
                );
                DeliveryOutcome::Sent {
                    user_id: profile.user_id.clone(),
                    message_id,
                }
            }
            Err(error) => self.fail(profile, error.to_string()).await,
        }
    }

    /// Record a failed attempt and settle the recipient as failed.
    async fn fail(&self, profile: &RecipientProfile, reason: String) -> DeliveryOutcome {
        warn!(user_id = %profile.user_id, %reason, "newsletter delivery failed");
        self.record(NewsletterLogEntry {
            user_id: profile.user_id.clone(),
            frequency: profile.newsletter_frequency,
            content: json!({ "error": reason }),
            status: DeliveryStatus::Failed,
        })
        .await;

        DeliveryOutcome::Failed {
            user_id: profile.user_id.clone(),
            reason,
        }
    }

    /// Insert a log entry; a failed insert is logged but does not change the
    /// recipient's outcome.
    async fn record(&self, entry: NewsletterLogEntry) {
        if let Err(error) = self.log.insert(entry).await {
            warn!(%error, "failed to write newsletter log entry");
        }
    }
}
