//! Mailbox and AI provider implementations.
//!
//! This module contains provider traits and implementations for external services:
//!
//! - [`email`] - Mailbox access (Gmail API)
//! - [`ai`] - LLM chat-completion providers (Groq and other OpenAI-compatible APIs)

pub mod ai;
pub mod email;
