//! Message and address types.

use chrono::{DateTime, Utc};

use super::{MessageId, ThreadId};

/// A single message as fetched from the mailbox.
///
/// Both body fields are optional. Messages with neither body are valid
/// and normalize to an empty classification input.
#[derive(Debug, Clone)]
pub struct Email {
    pub id: MessageId,
    /// Conversation the message belongs to.
    pub thread_id: ThreadId,
    pub from: Address,
    pub subject: Option<String>,
    /// Decoded `text/plain` body, when the message carries one.
    pub body_text: Option<String>,
    /// Decoded `text/html` body, used as a fallback when no plain text
    /// part exists.
    pub body_html: Option<String>,
    pub date: DateTime<Utc>,
}

/// A mailbox address, optionally paired with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub email: String,
    pub name: Option<String>,
}

impl Address {
    /// Address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), name: None }
    }

    /// Address carrying a display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(email)
        }
    }

    /// Formats as `Name <email>`, or the bare email when no name is set.
    pub fn display(&self) -> String {
        if let Some(name) = &self.name {
            format!("{} <{}>", name, self.email)
        } else {
            self.email.clone()
        }
    }
}
