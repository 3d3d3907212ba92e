//! Client for `/chat/completions` endpoints.
//!
//! Groq serves the OpenAI wire format, so one client covers both along
//! with any other compatible backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, LlmResult, Role,
};

/// Base URL of Groq's OpenAI-compatible API.
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

// Request body. Borrows from the caller's request; nothing here outlives
// the send call.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: Role,
    content: &'a str,
}

// Response body. Fields the crate never reads are simply not modeled;
// serde ignores the rest.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completion client for OpenAI-compatible backends.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Client pointed at Groq.
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::custom(GROQ_BASE_URL, Some(api_key.into()), model)
    }

    /// Client for any other compatible endpoint. A trailing slash on the
    /// base URL is tolerated; the key is optional for local backends.
    pub fn custom(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        }
    }

    fn chat_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    /// The reply is the content of the first choice. No choices, or a
    /// missing or empty content field, is a malformed response. A reply
    /// of pure whitespace is passed through untouched.
    fn reply_text(body: ChatResponse) -> LlmResult<String> {
        let first = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response carried no choices".into()))?;

        match first.message.content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(LlmError::InvalidResponse(
                "first choice carried no reply text".into(),
            )),
        }
    }

    async fn api_error(response: reqwest::Response) -> LlmError {
        let status = response.status().as_u16();
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("HTTP {status}"),
        };
        LlmError::ApiError { status, message }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> LlmResult<CompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut call = self.client.post(&url).json(&self.chat_body(request));
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("undecodable body: {e}")))?;

        Ok(CompletionResponse {
            text: Self::reply_text(body)?,
        })
    }
}
