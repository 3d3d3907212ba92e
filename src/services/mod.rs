//! Business services layer.
//!
//! This module contains the services that orchestrate the sentiment pass,
//! coordinating between providers, configuration, and domain types.
//!
//! # Architecture
//!
//! Services sit between the binary entry point and the infrastructure layer:
//!
//! ```text
//!     main (analyze / seed)
//!          |
//!          v
//!    Services Layer  <-- You are here
//!          |
//!          v
//! Infrastructure (Mailbox, LLM provider, Keychain)
//! ```
//!
//! # Services Overview
//!
//! - [`SentimentPipeline`]: Runs one bounded pass over recent inbox threads
//! - [`SentimentClassifier`]: Maps message text to a sentiment via an LLM
//! - [`TextNormalizer`]: Turns message bodies into classifier input
//! - [`LabelReconciler`]: Keeps each thread on exactly one sentiment label
//! - [`SampleSeeder`]: Mails sample messages to the account for a demo run

mod classifier;
mod normalizer;
mod pipeline;
mod reconciler;
mod seeder;

pub use classifier::SentimentClassifier;
pub use normalizer::{TextNormalizer, MAX_CLASSIFIED_CHARS};
pub use pipeline::{PipelineError, RunSummary, SentimentPipeline, INBOX_PAGE_SIZE};
pub use reconciler::{LabelReconciler, SentimentLabels};
pub use seeder::SampleSeeder;
