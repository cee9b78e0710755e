//! Service configuration.
//!
//! Loaded with figment: an optional `quotefeed.toml` in the working directory,
//! overridden by `QUOTEFEED_`-prefixed environment variables (nested keys use
//! a double underscore, e.g. `QUOTEFEED_EMAIL__API_KEY`). The store URL has
//! no default, and the `brevo` provider requires an API key; a missing value
//! fails startup.

use anyhow::Context;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

use crate::email::Mailbox;

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_app_base_url() -> String {
    "https://app.quotefeed.app".to_string()
}

fn default_provider_base_url() -> String {
    "https://api.brevo.com".to_string()
}

fn default_sender_name() -> String {
    "Quotefeed".to_string()
}

fn default_sender_address() -> String {
    "noreply@quotefeed.app".to_string()
}

/// Which email backend to run with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// The Brevo transactional HTTP API
    #[default]
    Brevo,
    /// Log-only backend for local runs without provider credentials
    Console,
}

/// Transactional email provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    /// Backend selection.
    #[serde(default)]
    pub provider: EmailProvider,

    /// Provider API key. Required for the `brevo` provider.
    #[serde(default)]
    pub api_key: String,

    /// Provider endpoint base URL.
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Sender display name on outbound email.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Sender address on outbound email.
    #[serde(default = "default_sender_address")]
    pub sender_address: String,
}

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection URL (privileged role). Required.
    pub database_url: String,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Base URL of the frontend, used for dashboard/settings links in emails.
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,

    /// Email provider settings.
    pub email: EmailSettings,
}

impl AppConfig {
    /// Load configuration from `quotefeed.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a required value is missing or a value cannot be
    /// parsed; the service must not start in that case.
    pub fn load() -> anyhow::Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::file("quotefeed.toml"))
            .merge(Env::prefixed("QUOTEFEED_").split("__"))
            .extract()
            .context("invalid or incomplete configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.email.provider == EmailProvider::Brevo && self.email.api_key.is_empty() {
            anyhow::bail!("email.api_key is required for the brevo provider");
        }
        Ok(())
    }

    /// Sender identity for outbound email.
    #[must_use]
    pub fn sender_mailbox(&self) -> Mailbox {
        Mailbox::new(&self.email.sender_address).with_name(&self.email.sender_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_optional_fields() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database_url": "postgres://localhost/quotefeed",
            "email": { "api_key": "xkeysib-test" },
        }))
        .unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.email.base_url, "https://api.brevo.com");
        assert_eq!(config.email.sender_address, "noreply@quotefeed.app");
    }

    #[test]
    fn brevo_without_api_key_is_rejected() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database_url": "postgres://localhost/quotefeed",
            "email": {},
        }))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn console_provider_needs_no_api_key() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database_url": "postgres://localhost/quotefeed",
            "email": { "provider": "console" },
        }))
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.email.provider, EmailProvider::Console);
    }

    #[test]
    fn sender_mailbox_carries_name_and_address() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database_url": "postgres://localhost/quotefeed",
            "email": {
                "api_key": "k",
                "sender_name": "Quotefeed Daily",
                "sender_address": "daily@quotefeed.app",
            },
        }))
        .unwrap();

        let mailbox = config.sender_mailbox();
        assert_eq!(mailbox.email, "daily@quotefeed.app");
        assert_eq!(mailbox.name.as_deref(), Some("Quotefeed Daily"));
    }
}
