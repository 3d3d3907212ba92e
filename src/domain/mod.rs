//! Domain layer types.
//!
//! This module contains the core domain types used throughout the crate:
//! email, thread, label, and sentiment entities.

mod email;
mod label;
mod sentiment;
mod thread;
mod types;

pub use email::{Address, Email};
pub use label::{system_labels, Label};
pub use sentiment::Sentiment;
pub use thread::Thread;
pub use types::{LabelId, MessageId, ThreadId};
