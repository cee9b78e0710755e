//! Narrow async seams over the relational store.
//!
//! The pipeline only ever touches the database through these traits: recipient
//! resolution, quote reads, identity lookup, and insert-only newsletter audit
//! logging. Production uses the Postgres implementation in [`postgres`]; tests
//! use the in-memory stores in [`crate::testing`].

mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use models::{
    DeliveryStatus, Frequency, Identity, NewsletterLogEntry, Quote, RecipientProfile,
};
pub use postgres::PgStore;

/// Errors surfaced by store operations.
///
/// Connectivity failures are distinguished from query failures because the
/// quote selector degrades differently on each: a failed tier query falls
/// through to the next tier, while a connectivity failure fails the whole
/// recipient.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, connection refused,
    /// TLS failure). Batch-fatal when raised by the recipient resolver.
    #[error("store connectivity error: {0}")]
    Connectivity(String),

    /// The store rejected or failed the query itself.
    #[error("store query error: {0}")]
    Query(String),

    /// A row came back in a shape the models cannot represent.
    #[error("store row decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// True when the underlying store was unreachable, as opposed to a
    /// query-level failure.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Connectivity(error.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Decode(error.to_string())
            }
            _ => Self::Query(error.to_string()),
        }
    }
}

/// Recipient profiles: resolution for batches plus the welcome-email flag.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profiles whose preference is not [`Frequency::Disabled`], optionally
    /// narrowed to one frequency and/or one user id. An empty result is not
    /// an error.
    async fn recipients(
        &self,
        frequency: Option<Frequency>,
        user_id: Option<&str>,
    ) -> Result<Vec<RecipientProfile>, StoreError>;

    /// A single profile by user id.
    async fn profile(&self, user_id: &str) -> Result<Option<RecipientProfile>, StoreError>;

    /// Record that the one-time welcome email has gone out.
    async fn mark_welcome_sent(&self, user_id: &str) -> Result<(), StoreError>;
}

/// Quote reads used by the selection fallback chain.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Up to `limit` of the user's favorite quotes, in the store's natural
    /// order.
    async fn favorites(&self, user_id: &str, limit: i64) -> Result<Vec<Quote>, StoreError>;

    /// Up to `limit` public quotes ordered by descending view count, across
    /// all users.
    async fn popular_public(&self, limit: i64) -> Result<Vec<Quote>, StoreError>;
}

/// Resolves a user id to an email address and display name.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn lookup(&self, user_id: &str) -> Result<Option<Identity>, StoreError>;
}

/// Insert-only audit log of delivery attempts.
#[async_trait]
pub trait NewsletterLogStore: Send + Sync {
    async fn insert(&self, entry: NewsletterLogEntry) -> Result<(), StoreError>;
}
