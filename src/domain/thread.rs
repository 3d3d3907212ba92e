//! Conversation threads.

use super::{Email, LabelId, ThreadId};

/// A conversation: every message the mailbox groups under one thread id,
/// plus the union of labels attached to those messages.
#[derive(Debug, Clone)]
pub struct Thread {
    pub id: ThreadId,
    /// Subject taken from the earliest message.
    pub subject: Option<String>,
    /// Messages in mailbox order, oldest first.
    pub messages: Vec<Email>,
    pub labels: Vec<LabelId>,
}

impl Thread {
    pub fn has_label(&self, label_id: &LabelId) -> bool {
        self.labels.iter().any(|l| l == label_id)
    }
}
