//! End-to-end inbox sentiment pass.
//!
//! Ties the pieces together: fetch recent inbox threads, normalize each
//! message, classify it, and reconcile the thread's sentiment label. One
//! run is one bounded pass; there is no incremental state between runs.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::Sentiment;
use crate::providers::email::{Mailbox, MailboxError, Pagination};
use crate::services::{LabelReconciler, SentimentClassifier, TextNormalizer};

/// Number of most-recent inbox threads examined per run.
pub const INBOX_PAGE_SIZE: usize = 10;

/// Errors that can end a pipeline run.
///
/// Classification failures never show up here; they surface as
/// [`Sentiment::Unprocessed`] labels on the affected messages instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Counts from one completed pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Threads fetched from the inbox.
    pub threads: usize,
    /// Messages classified and labeled.
    pub messages: usize,
    /// Messages per terminal sentiment.
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub unprocessed: usize,
}

impl RunSummary {
    fn record(&mut self, sentiment: Sentiment) {
        self.messages += 1;
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Unprocessed => self.unprocessed += 1,
        }
    }
}

/// Runs sentiment analysis over the most recent inbox threads.
pub struct SentimentPipeline {
    mailbox: Arc<dyn Mailbox>,
    normalizer: TextNormalizer,
    classifier: SentimentClassifier,
}

impl SentimentPipeline {
    /// Creates a pipeline over a mailbox and classifier.
    pub fn new(mailbox: Arc<dyn Mailbox>, classifier: SentimentClassifier) -> Self {
        Self {
            mailbox,
            normalizer: TextNormalizer::new(),
            classifier,
        }
    }

    /// Runs one pass over the inbox and returns what it did.
    ///
    /// Labels are resolved once up front. Messages are then processed
    /// strictly in sequence; a classification failure marks only that
    /// message unprocessed, while any mailbox error aborts the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let reconciler = LabelReconciler::initialize(self.mailbox.clone()).await?;

        let threads = self
            .mailbox
            .fetch_inbox_threads(Pagination::first(INBOX_PAGE_SIZE))
            .await?;

        let mut summary = RunSummary {
            threads: threads.len(),
            ..Default::default()
        };

        for thread in &threads {
            for message in &thread.messages {
                let text = self.normalizer.normalize(message);
                let sentiment = self.classifier.classify(&text).await;

                tracing::info!(
                    message_id = %message.id,
                    thread_id = %message.thread_id,
                    sentiment = %sentiment,
                    "classified message"
                );

                reconciler.reconcile(&message.thread_id, sentiment).await?;
                summary.record(sentiment);
            }
        }

        tracing::info!(
            threads = summary.threads,
            messages = summary.messages,
            positive = summary.positive,
            neutral = summary.neutral,
            negative = summary.negative,
            unprocessed = summary.unprocessed,
            "sentiment pass complete"
        );

        Ok(summary)
    }
}
