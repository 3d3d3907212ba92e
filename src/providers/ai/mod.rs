//! Chat-completion provider implementations.
//!
//! This module provides a unified interface for obtaining completions from
//! OpenAI-compatible endpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use tonemark::providers::ai::{
//!     CompletionRequest, LlmProvider, Message, OpenAiCompatibleProvider,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiCompatibleProvider::groq("gsk-...", "llama-3.1-8b-instant");
//!
//! let request = CompletionRequest::new(vec![
//!     Message::system("You are a sentiment classifier."),
//!     Message::user("Thanks, this is wonderful!"),
//! ]);
//!
//! let response = provider.complete(&request).await?;
//! println!("Reply: {}", response.text);
//! # Ok(())
//! # }
//! ```

mod openai;
mod traits;

pub use openai::OpenAiCompatibleProvider;
pub use traits::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, LlmResult, Message, Role,
};
