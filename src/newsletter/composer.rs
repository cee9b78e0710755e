//! Deterministic HTML email composition.
//!
//! Both templates are pure functions of their inputs: no timestamps, no
//! generated ids. The provider message id is recorded in the audit log, never
//! embedded in the body.

use askama::Template;

use crate::email::EmailError;
use crate::store::{Frequency, Quote};

use super::{QuoteSelection, SelectionTier};

/// Subject line of the welcome email.
pub const WELCOME_SUBJECT: &str = "Welcome to Quotefeed - your journey begins here!";

/// One rendered quote block.
struct QuoteBlock {
    text: String,
    attribution: String,
}

#[derive(Template)]
#[template(path = "newsletter_email.html")]
struct NewsletterEmailTemplate {
    display_name: String,
    curation_line: &'static str,
    quotes: Vec<QuoteBlock>,
    frequency: String,
    dashboard_url: String,
    settings_url: String,
}

#[derive(Template)]
#[template(path = "welcome_email.html")]
struct WelcomeEmailTemplate {
    display_name: String,
    dashboard_url: String,
}

fn attribution(quote: &Quote) -> String {
    match &quote.book {
        Some(book) => format!("— {}, {}", quote.author, book),
        None => format!("— {}", quote.author),
    }
}

/// Subject line for a newsletter at the given cadence.
#[must_use]
pub fn newsletter_subject(frequency: Frequency) -> String {
    format!("Your {frequency} inspiration from Quotefeed")
}

/// Render the newsletter body for one recipient.
///
/// Output is byte-identical for identical inputs.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn compose_newsletter(
    display_name: &str,
    selection: &QuoteSelection,
    frequency: Frequency,
    app_base_url: &str,
) -> Result<String, EmailError> {
    let base = app_base_url.trim_end_matches('/');
    let template = NewsletterEmailTemplate {
        display_name: display_name.to_string(),
        curation_line: match selection.tier {
            SelectionTier::Favorites => "selected from your personal favorites",
            SelectionTier::PopularPublic | SelectionTier::Default => "carefully curated",
        },
        quotes: selection
            .quotes
            .iter()
            .map(|quote| QuoteBlock {
                text: quote.text.clone(),
                attribution: attribution(quote),
            })
            .collect(),
        frequency: frequency.to_string(),
        dashboard_url: format!("{base}/dashboard"),
        settings_url: format!("{base}/settings"),
    };
    Ok(template.render()?)
}

/// Render the one-time welcome email body.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn compose_welcome(display_name: &str, app_base_url: &str) -> Result<String, EmailError> {
    let template = WelcomeEmailTemplate {
        display_name: display_name.to_string(),
        dashboard_url: format!("{}/dashboard", app_base_url.trim_end_matches('/')),
    };
    Ok(template.render()?)
}
