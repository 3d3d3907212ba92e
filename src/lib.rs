//! tonemark - Sentiment labels for your Gmail inbox
//!
//! This crate classifies the tone of recent inbox messages with an LLM and
//! files each thread under a matching Gmail label. It provides the mailbox
//! and chat-completion providers, the classification pipeline, and the
//! credential handling around them.

pub mod config;
pub mod domain;
pub mod providers;
pub mod services;
pub mod storage;
