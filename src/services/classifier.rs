//! Sentiment classification via a chat-completions provider.
//!
//! The classifier sends each message body to an LLM with a fixed system
//! prompt that constrains replies to a single word, then maps the reply
//! onto a [`Sentiment`]. Classification never fails: provider errors and
//! malformed replies are absorbed into terminal sentiments so one bad
//! message cannot take down an inbox pass.

use std::sync::Arc;

use crate::config::ClassifierSettings;
use crate::domain::Sentiment;
use crate::providers::ai::{CompletionRequest, LlmProvider, Message, OpenAiCompatibleProvider};

/// Instruction that pins the reply to one word.
const SYSTEM_PROMPT: &str =
    "You are a sentiment classifier. Reply with only one word: positive, neutral, or negative.";

/// Classifies message text into a [`Sentiment`].
///
/// A classifier without a provider is a first-class state, not an error:
/// it makes no network calls and marks everything unprocessed, so the rest
/// of the pipeline runs unchanged when no API key is configured.
pub struct SentimentClassifier {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl SentimentClassifier {
    /// Builds a classifier from settings.
    ///
    /// Without an API key the classifier comes up disabled.
    pub fn from_settings(settings: &ClassifierSettings) -> Self {
        match &settings.api_key {
            Some(key) => {
                let provider: Arc<dyn LlmProvider> = match &settings.base_url {
                    Some(url) => Arc::new(OpenAiCompatibleProvider::custom(
                        url.clone(),
                        Some(key.clone()),
                        settings.model.clone(),
                    )),
                    None => Arc::new(OpenAiCompatibleProvider::groq(
                        key.clone(),
                        settings.model.clone(),
                    )),
                };
                Self {
                    provider: Some(provider),
                }
            }
            None => {
                tracing::warn!("no classifier API key configured, messages will be marked unprocessed");
                Self::disabled()
            }
        }
    }

    /// Builds a classifier over an existing provider.
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Builds a disabled classifier that marks everything unprocessed.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Returns whether a provider is configured.
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Classifies the sentiment of the given message text.
    ///
    /// Blank input short-circuits to [`Sentiment::Neutral`] without touching
    /// the provider. Provider failures of any kind come back as
    /// [`Sentiment::Unprocessed`].
    pub async fn classify(&self, text: &str) -> Sentiment {
        let Some(provider) = &self.provider else {
            return Sentiment::Unprocessed;
        };

        if text.trim().is_empty() {
            tracing::debug!("blank classification input, defaulting to neutral");
            return Sentiment::Neutral;
        }

        let request =
            CompletionRequest::new(vec![Message::system(SYSTEM_PROMPT), Message::user(text)]);

        match provider.complete(&request).await {
            Ok(response) => Sentiment::from_reply(&response.text),
            Err(e) => {
                tracing::warn!(error = %e, "sentiment classification failed");
                Sentiment::Unprocessed
            }
        }
    }
}
