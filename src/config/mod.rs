//! Configuration and settings management.
//!
//! This module resolves runtime configuration from environment variables,
//! falling back to the OS keychain for credentials.

mod settings;

pub use settings::{
    ClassifierSettings, ConfigError, Settings, DEFAULT_MODEL, GROQ_KEY_ENV,
};
