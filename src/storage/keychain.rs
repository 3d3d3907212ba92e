//! OS keychain wrapper.
//!
//! Secrets live in the platform credential store under a single service
//! name. The keyring API is synchronous, so every call is pushed onto
//! the blocking pool.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("keychain backend error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("no keychain entry named {0}")]
    NotFound(String),

    #[error("keychain task did not complete: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, KeychainError>;

/// Handle to the credential store.
///
/// Environment variables win over keychain entries at configuration
/// load time, so this is the fallback store rather than the only one.
#[derive(Debug, Clone)]
pub struct KeychainAccess {
    service: String,
}

async fn on_blocking_pool<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|join_err| KeychainError::TaskFailed(join_err.to_string()))?
}

impl KeychainAccess {
    /// Service name all entries are stored under.
    pub const DEFAULT_SERVICE: &'static str = "tonemark";

    /// Entry holding the Groq API key.
    pub const GROQ_API_KEY: &'static str = "groq-key";

    /// Entry holding the Gmail OAuth credentials as JSON.
    pub const GMAIL_CREDENTIALS: &'static str = "gmail-oauth";

    pub fn new() -> Self {
        Self::with_service(Self::DEFAULT_SERVICE)
    }

    /// Uses a custom service name, which keeps tests away from real
    /// credentials.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    /// Writes a secret, replacing any existing value under the same key.
    pub async fn store(&self, key: &str, value: &str) -> Result<()> {
        let (service, key, value) = (self.service.clone(), key.to_owned(), value.to_owned());
        on_blocking_pool(move || {
            keyring::Entry::new(&service, &key)?.set_password(&value)?;
            Ok(())
        })
        .await
    }

    /// Reads a secret. An absent entry is `None`, not an error.
    pub async fn retrieve(&self, key: &str) -> Result<Option<String>> {
        let (service, key) = (self.service.clone(), key.to_owned());
        on_blocking_pool(move || {
            match keyring::Entry::new(&service, &key)?.get_password() {
                Ok(secret) => Ok(Some(secret)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Removes a secret. Deleting a missing entry is an error.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let (service, key) = (self.service.clone(), key.to_owned());
        on_blocking_pool(move || {
            match keyring::Entry::new(&service, &key)?.delete_credential() {
                Err(keyring::Error::NoEntry) => Err(KeychainError::NotFound(key)),
                other => other.map_err(KeychainError::from),
            }
        })
        .await
    }

    pub fn service_name(&self) -> &str {
        &self.service
    }
}

impl Default for KeychainAccess {
    fn default() -> Self {
        Self::new()
    }
}
