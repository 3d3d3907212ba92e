//! Mailbox implementations.
//!
//! This module contains the [`Mailbox`] trait and its Gmail implementation:
//!
//! - [`GmailMailbox`] - Gmail API with OAuth 2.0
//!
//! # Architecture
//!
//! The mailbox abstraction keeps the sentiment pipeline independent of any
//! concrete email service. A mailbox handles:
//!
//! - Fetching inbox threads with decoded message bodies
//! - Listing and creating labels
//! - Applying and removing labels on threads
//! - Sending messages (used to seed sample mail)
//!
//! # Example
//!
//! ```ignore
//! use tonemark::providers::email::{Mailbox, Pagination};
//!
//! async fn list_inbox(mailbox: &dyn Mailbox) {
//!     let threads = mailbox
//!         .fetch_inbox_threads(Pagination::first(10))
//!         .await
//!         .expect("failed to fetch threads");
//!
//!     for thread in threads {
//!         println!("{}", thread.subject.unwrap_or_default());
//!     }
//! }
//! ```

mod gmail;
mod traits;

pub use gmail::{GmailCredentials, GmailMailbox};
pub use traits::{Mailbox, MailboxError, OutgoingMessage, Pagination, Result};
