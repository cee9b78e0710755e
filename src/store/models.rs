//! Domain models read from (and written to) the relational store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Newsletter cadence preference stored on a profile.
///
/// Stored as lowercase text in the database and serialized the same way on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One newsletter per day
    Daily,
    /// One newsletter per week
    Weekly,
    /// One newsletter per month
    Monthly,
    /// Newsletter delivery switched off
    Disabled,
}

impl Frequency {
    /// Lowercase text form, matching the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown newsletter frequency: {other}")),
        }
    }
}

/// A profile row as the newsletter pipeline sees it.
///
/// Profiles are created and mutated elsewhere (settings updates, first-login
/// detection); the pipeline only reads them, except for the
/// `welcome_email_sent` flag which the welcome-email operation flips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientProfile {
    /// Owning user id
    pub user_id: String,
    /// Display name, when the user has set one
    pub name: Option<String>,
    /// Cadence preference
    pub newsletter_frequency: Frequency,
    /// Whether the one-time welcome email has gone out
    pub welcome_email_sent: bool,
    /// Whether the user has completed their first login
    pub first_login_completed: bool,
}

/// A stored quote. Read-only from the pipeline's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Quote id; the built-in fallback quote uses the sentinel `"default"`
    pub id: String,
    /// The quote text itself
    pub text: String,
    /// Attributed author
    pub author: String,
    /// Book the quote was taken from
    pub book: Option<String>,
    /// Chapter within the book
    pub chapter: Option<String>,
    /// Page number within the book
    pub page_number: Option<i32>,
    /// Link to the source
    pub source_url: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Marked as a favorite by its owner
    pub is_favorite: bool,
    /// Visible to other users
    pub is_public: bool,
    /// Global view counter
    pub view_count: i32,
    /// Global share counter
    pub share_count: i32,
    /// Owning user id; empty for the built-in fallback quote
    pub user_id: String,
}

/// Email address and display name resolved from the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Verified email address
    pub email: String,
    /// Display name from the identity record, if any
    pub name: Option<String>,
}

/// Outcome status recorded on a newsletter log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Provider accepted the email
    Sent,
    /// Delivery was not attempted or the provider rejected it
    Failed,
}

impl DeliveryStatus {
    /// Lowercase text form, matching the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// One audit record per delivery attempt.
///
/// Insert-only: a log entry is the ground truth of whether a recipient was
/// processed in a given invocation. The `sent_at` timestamp is assigned by
/// the store on insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterLogEntry {
    /// Recipient user id
    pub user_id: String,
    /// Frequency the batch was running for
    pub frequency: Frequency,
    /// Content snapshot: selected quotes and provider message id on success,
    /// an error description on failure
    pub content: serde_json::Value,
    /// Outcome status
    pub status: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_round_trips_through_text() {
        for frequency in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Disabled,
        ] {
            assert_eq!(frequency.as_str().parse::<Frequency>(), Ok(frequency));
        }
    }

    #[test]
    fn frequency_rejects_unknown_values() {
        assert!("fortnightly".parse::<Frequency>().is_err());
        assert!("Daily".parse::<Frequency>().is_err());
    }

    #[test]
    fn frequency_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Frequency::Weekly).unwrap(),
            "\"weekly\""
        );
        let parsed: Frequency = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(parsed, Frequency::Monthly);
    }

    #[test]
    fn delivery_status_text_forms() {
        assert_eq!(DeliveryStatus::Sent.as_str(), "sent");
        assert_eq!(DeliveryStatus::Failed.as_str(), "failed");
    }
}
