//! Reconciles sentiment labels on mailbox threads.
//!
//! Provides label reconciliation including:
//! - Resolving the four sentiment labels by name, creating missing ones
//! - Replacing a thread's sentiment labels with exactly one
//! - Idempotent re-application across repeated runs

use std::sync::Arc;

use crate::domain::{Label, LabelId, Sentiment, ThreadId};
use crate::providers::email::{Mailbox, Result};

/// The four sentiment labels resolved to provider label IDs.
#[derive(Debug, Clone)]
pub struct SentimentLabels {
    positive: LabelId,
    neutral: LabelId,
    negative: LabelId,
    unprocessed: LabelId,
}

impl SentimentLabels {
    /// Returns the label ID for a sentiment.
    pub fn id(&self, sentiment: Sentiment) -> &LabelId {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
            Sentiment::Unprocessed => &self.unprocessed,
        }
    }

    /// Returns the label IDs of every sentiment except the given one.
    pub fn others(&self, sentiment: Sentiment) -> Vec<LabelId> {
        Sentiment::ALL
            .iter()
            .filter(|s| **s != sentiment)
            .map(|s| self.id(*s).clone())
            .collect()
    }
}

/// Applies sentiment labels to threads, keeping at most one per thread.
pub struct LabelReconciler {
    mailbox: Arc<dyn Mailbox>,
    labels: SentimentLabels,
}

impl LabelReconciler {
    /// Resolves the sentiment labels and builds a reconciler over them.
    ///
    /// Labels are matched by exact name against the mailbox's existing
    /// labels; any that are missing get created. Called once per run so
    /// label resolution cost does not scale with message count.
    pub async fn initialize(mailbox: Arc<dyn Mailbox>) -> Result<Self> {
        let existing = mailbox.fetch_labels().await?;

        let labels = SentimentLabels {
            positive: Self::ensure_label(mailbox.as_ref(), &existing, Sentiment::Positive).await?,
            neutral: Self::ensure_label(mailbox.as_ref(), &existing, Sentiment::Neutral).await?,
            negative: Self::ensure_label(mailbox.as_ref(), &existing, Sentiment::Negative).await?,
            unprocessed: Self::ensure_label(mailbox.as_ref(), &existing, Sentiment::Unprocessed)
                .await?,
        };

        Ok(Self { mailbox, labels })
    }

    /// Returns the resolved sentiment labels.
    pub fn labels(&self) -> &SentimentLabels {
        &self.labels
    }

    /// Sets a thread's sentiment to exactly one label.
    ///
    /// The chosen label is added and the other three removed in a single
    /// modify call. Removing a label the thread doesn't carry is a no-op,
    /// so this is safe to repeat and safe on fresh threads.
    pub async fn reconcile(&self, thread_id: &ThreadId, sentiment: Sentiment) -> Result<()> {
        let add = [self.labels.id(sentiment).clone()];
        let remove = self.labels.others(sentiment);

        self.mailbox.modify_labels(thread_id, &add, &remove).await
    }

    async fn ensure_label(
        mailbox: &dyn Mailbox,
        existing: &[Label],
        sentiment: Sentiment,
    ) -> Result<LabelId> {
        let name = sentiment.label_name();

        if let Some(label) = existing.iter().find(|l| l.name == name) {
            return Ok(label.id.clone());
        }

        let created = mailbox.create_label(name).await?;
        Ok(created.id)
    }
}
