//! Application settings and configuration types.
//!
//! Settings are resolved at startup from environment variables, with the OS
//! keychain as a fallback for credentials. Nothing is persisted to disk by
//! this module.

use thiserror::Error;

use crate::providers::email::GmailCredentials;
use crate::storage::{KeychainAccess, KeychainError};

/// Errors that can occur while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Keychain error: {0}")]
    Keychain(#[from] KeychainError),

    #[error("Invalid credential format: {0}")]
    InvalidCredential(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable holding the Groq API key.
pub const GROQ_KEY_ENV: &str = "GROQ_KEY";

/// Default chat model used for sentiment classification.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const MODEL_ENV: &str = "TONEMARK_MODEL";
const BASE_URL_ENV: &str = "TONEMARK_BASE_URL";
const GMAIL_CLIENT_ID_ENV: &str = "GMAIL_CLIENT_ID";
const GMAIL_CLIENT_SECRET_ENV: &str = "GMAIL_CLIENT_SECRET";
const GMAIL_REFRESH_TOKEN_ENV: &str = "GMAIL_REFRESH_TOKEN";

/// Top-level application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Sentiment classifier configuration.
    pub classifier: ClassifierSettings,
    /// Gmail OAuth credentials, if configured.
    pub gmail: Option<GmailCredentials>,
}

/// Configuration for the sentiment classifier.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    /// API key for the chat-completions provider.
    ///
    /// `None` leaves the classifier disabled: messages are still processed
    /// but every one of them is marked unprocessed.
    pub api_key: Option<String>,
    /// Custom API endpoint (for self-hosted or compatible APIs).
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ClassifierSettings {
    /// Returns whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Settings {
    /// Resolves settings from the environment and the OS keychain.
    ///
    /// The classifier key is looked up in `GROQ_KEY` first and then in the
    /// keychain. A keychain failure on that path is downgraded to "no key"
    /// since a missing classifier credential is a degraded state, not a
    /// fatal one. Gmail credential failures are fatal because nothing can
    /// run without the mailbox.
    pub async fn load(keychain: &KeychainAccess) -> Result<Self> {
        let api_key = match env_var(GROQ_KEY_ENV) {
            Some(key) => Some(key),
            None => match keychain.retrieve(KeychainAccess::GROQ_API_KEY).await {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!(error = %e, "keychain unavailable, classifier key not loaded");
                    None
                }
            },
        };

        let classifier = ClassifierSettings {
            api_key,
            base_url: env_var(BASE_URL_ENV),
            model: env_var(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };

        let gmail = Self::load_gmail_credentials(keychain).await?;

        Ok(Self { classifier, gmail })
    }

    /// Loads Gmail OAuth credentials from the environment or the keychain.
    ///
    /// The environment wins when all three variables are set; otherwise the
    /// keychain entry is read as JSON.
    async fn load_gmail_credentials(
        keychain: &KeychainAccess,
    ) -> Result<Option<GmailCredentials>> {
        if let (Some(client_id), Some(client_secret), Some(refresh_token)) = (
            env_var(GMAIL_CLIENT_ID_ENV),
            env_var(GMAIL_CLIENT_SECRET_ENV),
            env_var(GMAIL_REFRESH_TOKEN_ENV),
        ) {
            return Ok(Some(GmailCredentials {
                client_id,
                client_secret,
                refresh_token,
            }));
        }

        match keychain.retrieve(KeychainAccess::GMAIL_CREDENTIALS).await? {
            Some(json) => parse_gmail_credentials(&json).map(Some),
            None => Ok(None),
        }
    }
}

/// Parses Gmail OAuth credentials from their keychain JSON form.
fn parse_gmail_credentials(json: &str) -> Result<GmailCredentials> {
    serde_json::from_str(json).map_err(|e| ConfigError::InvalidCredential(e.to_string()))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
