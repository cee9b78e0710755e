//! In-memory collaborators for tests.
//!
//! [`MemoryStore`] implements every store seam over a shared in-memory table
//! set, with per-operation failure injection. [`MockEmailSender`] records
//! outgoing email and can be told to fail for specific addresses.
//!
//! All methods panic on a poisoned mutex, which cannot happen in tests that
//! pass.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::email::{Email, EmailError, EmailSender, MessageId};
use crate::store::{
    Frequency, Identity, IdentityStore, NewsletterLogEntry, NewsletterLogStore, ProfileStore,
    Quote, QuoteStore, RecipientProfile, StoreError,
};

/// Convenience constructor for a recipient profile.
#[must_use]
pub fn test_profile(user_id: &str, name: Option<&str>, frequency: Frequency) -> RecipientProfile {
    RecipientProfile {
        user_id: user_id.to_string(),
        name: name.map(ToString::to_string),
        newsletter_frequency: frequency,
        welcome_email_sent: false,
        first_login_completed: true,
    }
}

/// Convenience constructor for a quote.
#[must_use]
pub fn test_quote(id: &str, user_id: &str, text: &str, favorite: bool) -> Quote {
    Quote {
        id: id.to_string(),
        text: text.to_string(),
        author: "Test Author".to_string(),
        book: None,
        chapter: None,
        page_number: None,
        source_url: None,
        tags: Vec::new(),
        is_favorite: favorite,
        is_public: false,
        view_count: 0,
        share_count: 0,
        user_id: user_id.to_string(),
    }
}

#[derive(Default)]
struct StoreInner {
    profiles: Vec<RecipientProfile>,
    quotes: Vec<Quote>,
    identities: HashMap<String, Identity>,
    logs: Vec<NewsletterLogEntry>,
    recipients_error: Option<StoreError>,
    favorites_error: Option<StoreError>,
    popular_error: Option<StoreError>,
    identity_error: Option<StoreError>,
    log_error: Option<StoreError>,
}

/// In-memory store implementing every store seam.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile row.
    pub fn push_profile(&self, profile: RecipientProfile) {
        self.inner.lock().unwrap().profiles.push(profile);
    }

    /// Add a quote row.
    pub fn push_quote(&self, quote: Quote) {
        self.inner.lock().unwrap().quotes.push(quote);
    }

    /// Register an identity record for a user.
    pub fn set_identity(&self, user_id: &str, email: &str, name: Option<&str>) {
        self.inner.lock().unwrap().identities.insert(
            user_id.to_string(),
            Identity {
                email: email.to_string(),
                name: name.map(ToString::to_string),
            },
        );
    }

    /// Make recipient resolution fail with `error`.
    pub fn fail_recipients(&self, error: StoreError) {
        self.inner.lock().unwrap().recipients_error = Some(error);
    }

    /// Make the favorites query fail with `error`.
    pub fn fail_favorites(&self, error: StoreError) {
        self.inner.lock().unwrap().favorites_error = Some(error);
    }

    /// Make the popular-public query fail with `error`.
    pub fn fail_popular(&self, error: StoreError) {
        self.inner.lock().unwrap().popular_error = Some(error);
    }

    /// Make identity lookups fail with `error`.
    pub fn fail_identity(&self, error: StoreError) {
        self.inner.lock().unwrap().identity_error = Some(error);
    }

    /// Make log inserts fail with `error`.
    pub fn fail_log(&self, error: StoreError) {
        self.inner.lock().unwrap().log_error = Some(error);
    }

    /// Snapshot of every log entry written so far.
    #[must_use]
    pub fn log_entries(&self) -> Vec<NewsletterLogEntry> {
        self.inner.lock().unwrap().logs.clone()
    }

    /// Log entries written for one user.
    #[must_use]
    pub fn log_entries_for(&self, user_id: &str) -> Vec<NewsletterLogEntry> {
        self.log_entries()
            .into_iter()
            .filter(|entry| entry.user_id == user_id)
            .collect()
    }

    /// Whether the welcome flag is set for a user.
    #[must_use]
    pub fn welcome_sent(&self, user_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .profiles
            .iter()
            .any(|p| p.user_id == user_id && p.welcome_email_sent)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn recipients(
        &self,
        frequency: Option<Frequency>,
        user_id: Option<&str>,
    ) -> Result<Vec<RecipientProfile>, StoreError> {
        let inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.recipients_error {
            return Err(error.clone());
        }
        Ok(inner
            .profiles
            .iter()
            .filter(|p| p.newsletter_frequency != Frequency::Disabled)
            .filter(|p| frequency.is_none_or(|f| p.newsletter_frequency == f))
            .filter(|p| user_id.is_none_or(|id| p.user_id == id))
            .cloned()
            .collect())
    }

    async fn profile(&self, user_id: &str) -> Result<Option<RecipientProfile>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn mark_welcome_sent(&self, user_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        for profile in &mut inner.profiles {
            if profile.user_id == user_id {
                profile.welcome_email_sent = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn favorites(&self, user_id: &str, limit: i64) -> Result<Vec<Quote>, StoreError> {
        let inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.favorites_error {
            return Err(error.clone());
        }
        Ok(inner
            .quotes
            .iter()
            .filter(|q| q.user_id == user_id && q.is_favorite)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn popular_public(&self, limit: i64) -> Result<Vec<Quote>, StoreError> {
        let inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.popular_error {
            return Err(error.clone());
        }
        let mut public: Vec<Quote> = inner.quotes.iter().filter(|q| q.is_public).cloned().collect();
        public.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        public.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(public)
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn lookup(&self, user_id: &str) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.identity_error {
            return Err(error.clone());
        }
        Ok(inner.identities.get(user_id).cloned())
    }
}

#[async_trait]
impl NewsletterLogStore for MemoryStore {
    async fn insert(&self, entry: NewsletterLogEntry) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.log_error {
            return Err(error.clone());
        }
        inner.logs.push(entry);
        Ok(())
    }
}

#[derive(Default)]
struct MockInner {
    sent: Vec<Email>,
    fail_addresses: HashSet<String>,
    counter: usize,
}

/// Email sender that records messages instead of sending them.
#[derive(Clone, Default)]
pub struct MockEmailSender {
    inner: Arc<Mutex<MockInner>>,
}

impl MockEmailSender {
    /// Create a new recording sender.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a provider failure for every send addressed to `address`.
    pub fn fail_for(&self, address: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_addresses
            .insert(address.to_string());
    }

    /// Number of accepted sends.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }

    /// All accepted sends.
    #[must_use]
    pub fn sent_emails(&self) -> Vec<Email> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Whether any accepted send was addressed to `address`.
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .sent
            .iter()
            .any(|email| email.to.iter().any(|m| m.email == address))
    }

    /// The most recent accepted send.
    #[must_use]
    pub fn last_sent(&self) -> Option<Email> {
        self.inner.lock().unwrap().sent.last().cloned()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, email: Email) -> Result<MessageId, EmailError> {
        email.validate()?;

        let mut inner = self.inner.lock().unwrap();
        if email
            .to
            .iter()
            .any(|m| inner.fail_addresses.contains(&m.email))
        {
            return Err(EmailError::Provider {
                status: 500,
                detail: "injected provider failure".to_string(),
            });
        }

        inner.counter += 1;
        let id = MessageId::new(format!("mock-{}", inner.counter));
        inner.sent.push(email);
        Ok(id)
    }
}
