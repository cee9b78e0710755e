//! Postgres implementations of the store seams, over `sqlx`.
//!
//! Expected shapes (the schema itself is owned and migrated elsewhere):
//!
//! - `profiles(user_id text, name text null, newsletter_frequency text,
//!   welcome_email_sent bool, first_login_completed bool)`
//! - `quotes(id text, quote_text text, author text, book text null,
//!   chapter text null, page_number int null, source_url text null,
//!   tags text[], is_favorite bool, is_public bool, view_count int,
//!   share_count int, user_id text)`
//! - `users(id text, email text, name text null)` - the identity/auth store
//! - `newsletter_logs(user_id text, frequency text, content jsonb,
//!   status text, sent_at timestamptz)` - insert-only from here

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};

use super::{
    Frequency, Identity, IdentityStore, NewsletterLogEntry, NewsletterLogStore, ProfileStore,
    Quote, QuoteStore, RecipientProfile, StoreError,
};

const QUOTE_COLUMNS: &str = "id, quote_text, author, book, chapter, page_number, source_url, \
     tags, is_favorite, is_public, view_count, share_count, user_id";

/// Store backed by a shared Postgres connection pool.
///
/// The pool is safe for concurrent use, so one `PgStore` serves every
/// in-flight recipient pipeline of a batch.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> Result<RecipientProfile, StoreError> {
    let frequency: String = row.try_get("newsletter_frequency")?;
    Ok(RecipientProfile {
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        newsletter_frequency: frequency.parse().map_err(StoreError::Decode)?,
        welcome_email_sent: row.try_get("welcome_email_sent")?,
        first_login_completed: row.try_get("first_login_completed")?,
    })
}

fn quote_from_row(row: &PgRow) -> Result<Quote, StoreError> {
    Ok(Quote {
        id: row.try_get("id")?,
        text: row.try_get("quote_text")?,
        author: row.try_get("author")?,
        book: row.try_get("book")?,
        chapter: row.try_get("chapter")?,
        page_number: row.try_get("page_number")?,
        source_url: row.try_get("source_url")?,
        tags: row.try_get("tags")?,
        is_favorite: row.try_get("is_favorite")?,
        is_public: row.try_get("is_public")?,
        view_count: row.try_get("view_count")?,
        share_count: row.try_get("share_count")?,
        user_id: row.try_get("user_id")?,
    })
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn recipients(
        &self,
        frequency: Option<Frequency>,
        user_id: Option<&str>,
    ) -> Result<Vec<RecipientProfile>, StoreError> {
        let mut query = QueryBuilder::new(
            "SELECT user_id, name, newsletter_frequency, welcome_email_sent, \
             first_login_completed FROM profiles WHERE newsletter_frequency <> ",
        );
        query.push_bind(Frequency::Disabled.as_str());
        if let Some(frequency) = frequency {
            query.push(" AND newsletter_frequency = ");
            query.push_bind(frequency.as_str());
        }
        if let Some(user_id) = user_id {
            query.push(" AND user_id = ");
            query.push_bind(user_id);
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(profile_from_row).collect()
    }

    async fn profile(&self, user_id: &str) -> Result<Option<RecipientProfile>, StoreError> {
        let row = sqlx::query(
            "SELECT user_id, name, newsletter_frequency, welcome_email_sent, \
             first_login_completed FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn mark_welcome_sent(&self, user_id: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE profiles SET welcome_email_sent = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for PgStore {
    async fn favorites(&self, user_id: &str, limit: i64) -> Result<Vec<Quote>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE user_id = $1 AND is_favorite LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(quote_from_row).collect()
    }

    async fn popular_public(&self, limit: i64) -> Result<Vec<Quote>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE is_public \
             ORDER BY view_count DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(quote_from_row).collect()
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn lookup(&self, user_id: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query("SELECT email, name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Identity {
                email: row.try_get("email")?,
                name: row.try_get("name")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl NewsletterLogStore for PgStore {
    async fn insert(&self, entry: NewsletterLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO newsletter_logs (user_id, frequency, content, status, sent_at) \
             VALUES ($1, $2, $3, $4, now())",
        )
        .bind(&entry.user_id)
        .bind(entry.frequency.as_str())
        .bind(&entry.content)
        .bind(entry.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
