//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::email::EmailSender;
use crate::newsletter::NewsletterPipeline;
use crate::store::{IdentityStore, NewsletterLogStore, ProfileStore, QuoteStore};

/// Application state handed to every handler.
///
/// Collaborators are held behind trait objects so tests can swap in the
/// in-memory stores and the recording email sender.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Profile store
    pub profiles: Arc<dyn ProfileStore>,
    /// Quote store
    pub quotes: Arc<dyn QuoteStore>,
    /// Identity store
    pub identity: Arc<dyn IdentityStore>,
    /// Newsletter audit log
    pub newsletter_log: Arc<dyn NewsletterLogStore>,
    /// Email backend
    pub email: Arc<dyn EmailSender>,
}

impl AppState {
    /// Assemble state from its collaborators.
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        profiles: Arc<dyn ProfileStore>,
        quotes: Arc<dyn QuoteStore>,
        identity: Arc<dyn IdentityStore>,
        newsletter_log: Arc<dyn NewsletterLogStore>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            profiles,
            quotes,
            identity,
            newsletter_log,
            email,
        }
    }

    /// Build a newsletter pipeline over this state's collaborators.
    #[must_use]
    pub fn pipeline(&self) -> NewsletterPipeline {
        NewsletterPipeline::new(
            Arc::clone(&self.profiles),
            Arc::clone(&self.quotes),
            Arc::clone(&self.identity),
            Arc::clone(&self.newsletter_log),
            Arc::clone(&self.email),
            self.config.sender_mailbox(),
            self.config.app_base_url.clone(),
        )
    }
}
