//! Mailbox abstraction.
//!
//! The pipeline, reconciler and seeder only ever see [`Mailbox`]. Gmail
//! implements it in production; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::domain::{Address, Label, LabelId, MessageId, Thread, ThreadId};

pub type Result<T> = std::result::Result<T, MailboxError>;

#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Credentials were rejected or have expired.
    #[error("mailbox authentication failed: {0}")]
    Authentication(String),

    /// The backend could not be reached.
    #[error("mailbox connection failed: {0}")]
    Connection(String),

    #[error("mailbox rate limit hit, retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("mailbox resource not found: {0}")]
    NotFound(String),

    /// Any other error the backend reported.
    #[error("mailbox backend error: {0}")]
    Provider(String),

    #[error("mailbox internal error: {0}")]
    Internal(String),
}

/// Window over the thread listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    /// Threads to skip from the front of the listing.
    pub offset: usize,
    /// Maximum threads to return.
    pub limit: usize,
}

impl Pagination {
    /// The first `limit` threads.
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }
}

/// A message to be sent.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub to: Vec<Address>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    /// Display name for the From header, if any.
    pub from_name: Option<String>,
}

/// One mail account, authenticated and ready for use.
///
/// Listing returns complete threads with decoded bodies, newest thread
/// first. Label names round-trip verbatim between [`Mailbox::create_label`]
/// and [`Mailbox::fetch_labels`]: reconciliation matches on them.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Backend name for logs, e.g. "gmail".
    fn name(&self) -> &str;

    /// A page of the most recent inbox threads.
    async fn fetch_inbox_threads(&self, pagination: Pagination) -> Result<Vec<Thread>>;

    /// Every label on the account, system and user-created alike.
    async fn fetch_labels(&self) -> Result<Vec<Label>>;

    /// Creates a user label carrying the given display name.
    async fn create_label(&self, name: &str) -> Result<Label>;

    /// Attaches and detaches labels on a thread in one call. Removing a
    /// label that is not attached is a no-op.
    async fn modify_labels(
        &self,
        thread_id: &ThreadId,
        add: &[LabelId],
        remove: &[LabelId],
    ) -> Result<()>;

    /// Sends a message and returns the id the backend assigned to it.
    async fn send_message(&self, message: &OutgoingMessage) -> Result<MessageId>;

    /// Email address of the authenticated account.
    async fn user_email(&self) -> Result<String>;
}
