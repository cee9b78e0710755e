//! The newsletter pipeline: per-user quote selection, email composition,
//! delivery with audit logging, and batch aggregation.
//!
//! Control flow for one trigger:
//!
//! ```text
//! intake -> resolver -> [selector -> composer -> delivery + logging]
//!                        (independently per recipient)
//!        -> aggregator -> response
//! ```
//!
//! Recipients within a sub-batch run concurrently and settle independently;
//! one recipient's failure never aborts its siblings.

mod batch;
mod composer;
mod delivery;
mod selector;

pub use batch::{BatchReport, BatchSummary, FrequencyBatch, NewsletterPipeline};
pub use composer::{compose_newsletter, compose_welcome, newsletter_subject, WELCOME_SUBJECT};
pub use delivery::DeliveryOutcome;
pub use selector::{
    default_quote, select_quotes, QuoteSelection, SelectionTier, DEFAULT_QUOTE_ID,
    FAVORITES_LIMIT, POPULAR_LIMIT,
};
