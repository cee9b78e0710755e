//! Batch orchestration: recipient resolution, concurrent fan-out, and
//! outcome aggregation.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use crate::email::{EmailSender, Mailbox};
use crate::store::{
    Frequency, IdentityStore, NewsletterLogStore, ProfileStore, QuoteStore, StoreError,
};

use super::DeliveryOutcome;

/// Aggregate counts for one processed batch.
///
/// Computed purely from the in-memory outcomes of this invocation, never
/// recomputed from the log store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Recipients whose email the provider accepted
    pub sent: usize,
    /// Recipients that failed anywhere in their pipeline
    pub failed: usize,
    /// Always `sent + failed`
    pub total: usize,
}

impl BatchSummary {
    /// Tally a set of per-recipient outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[DeliveryOutcome]) -> Self {
        let sent = outcomes.iter().filter(|o| o.is_sent()).count();
        Self {
            sent,
            failed: outcomes.len() - sent,
            total: outcomes.len(),
        }
    }
}

/// Per-frequency result inside a multi-frequency invocation.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyBatch {
    /// The frequency this sub-batch ran for
    pub frequency: Frequency,
    /// Its aggregate counts
    #[serde(flatten)]
    pub summary: BatchSummary,
}

/// The full result of one trigger invocation.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Total accepted sends across all sub-batches
    pub sent: usize,
    /// Total failures across all sub-batches
    pub failed: usize,
    /// `sent + failed`
    pub total: usize,
    /// Per-frequency breakdown, present only for multi-frequency invocations
    pub details: Option<Vec<FrequencyBatch>>,
}

/// The newsletter pipeline with its collaborators.
///
/// Holds the store seams, the email backend, and the sender identity; one
/// instance serves every recipient of an invocation. All work happens inside
/// [`run`](Self::run) - constructing a pipeline has no side effects.
pub struct NewsletterPipeline {
    pub(crate) profiles: Arc<dyn ProfileStore>,
    pub(crate) quotes: Arc<dyn QuoteStore>,
    pub(crate) identity: Arc<dyn IdentityStore>,
    pub(crate) log: Arc<dyn NewsletterLogStore>,
    pub(crate) email: Arc<dyn EmailSender>,
    pub(crate) sender: Mailbox,
    pub(crate) app_base_url: String,
}

impl NewsletterPipeline {
    /// Assemble a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        quotes: Arc<dyn QuoteStore>,
        identity: Arc<dyn IdentityStore>,
        log: Arc<dyn NewsletterLogStore>,
        email: Arc<dyn EmailSender>,
        sender: Mailbox,
        app_base_url: impl Into<String>,
    ) -> Self {
        Self {
            profiles,
            quotes,
            identity,
            log,
            email,
            sender,
            app_base_url: app_base_url.into(),
        }
    }

    /// Run one trigger invocation.
    ///
    /// With an explicit `frequency`, processes that single sub-batch. Without
    /// one, processes `daily` then `weekly` sequentially and attaches a
    /// per-frequency breakdown to the report. `user_id` restricts every
    /// sub-batch to that single recipient (ad hoc and test sends).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only when recipient resolution fails; that error
    /// is batch-fatal and no recipient of the failing sub-batch is attempted.
    pub async fn run(
        &self,
        frequency: Option<Frequency>,
        user_id: Option<&str>,
    ) -> Result<BatchReport, StoreError> {
        let explicit = frequency.is_some();
        let frequencies = match frequency {
            Some(frequency) => vec![frequency],
            None => vec![Frequency::Daily, Frequency::Weekly],
        };

        let mut batches = Vec::with_capacity(frequencies.len());
        for frequency in frequencies {
            let summary = self.run_frequency(frequency, user_id).await?;
            info!(
                %frequency,
                sent = summary.sent,
                failed = summary.failed,
                "newsletter sub-batch complete"
            );
            batches.push(FrequencyBatch { frequency, summary });
        }

        let sent = batches.iter().map(|b| b.summary.sent).sum();
        let failed = batches.iter().map(|b| b.summary.failed).sum();
        Ok(BatchReport {
            sent,
            failed,
            total: sent + failed,
            details: (!explicit).then_some(batches),
        })
    }

    /// Process every recipient of one frequency concurrently.
    ///
    /// Recipient pipelines are started together and all of them settle before
    /// the summary is computed; each contributes exactly one outcome and none
    /// can abort a sibling.
    async fn run_frequency(
        &self,
        frequency: Frequency,
        user_id: Option<&str>,
    ) -> Result<BatchSummary, StoreError> {
        let recipients = self.profiles.recipients(Some(frequency), user_id).await?;
        if recipients.is_empty() {
            info!(%frequency, "no recipients matched");
            return Ok(BatchSummary::default());
        }

        info!(%frequency, recipients = recipients.len(), "processing newsletter sub-batch");

        let outcomes = join_all(recipients.iter().map(|profile| self.deliver(profile))).await;
        Ok(BatchSummary::from_outcomes(&outcomes))
    }
}
