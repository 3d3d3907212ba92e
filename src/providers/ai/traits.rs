//! Chat-completion provider abstraction.
//!
//! The classifier talks to any backend through [`LlmProvider`], so unit
//! tests can swap in scripted providers and the wire client stays in one
//! place.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion transport failure: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("completion API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("malformed completion payload: {0}")]
    InvalidResponse(String),
}

pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    fn of(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::of(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::of(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::of(Role::Assistant, content)
    }
}

/// A completion request.
///
/// Temperature defaults to zero. Classification wants the same answer
/// for the same input, so callers opt in to sampling rather than out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Conversation, system instruction first.
    pub messages: Vec<Message>,

    #[serde(default)]
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, ..Self::default() }
    }

    pub fn with_temperature(self, temperature: f32) -> Self {
        Self { temperature, ..self }
    }

    pub fn with_max_tokens(self, max_tokens: usize) -> Self {
        Self { max_tokens: Some(max_tokens), ..self }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Assistant reply text.
    pub text: String,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend name for logs, e.g. "groq".
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> LlmResult<CompletionResponse>;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;
}
