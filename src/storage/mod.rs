//! Credential storage.
//!
//! The pipeline itself is stateless, so the storage layer is just the OS
//! keychain integration used to hold API credentials between runs. Keychain
//! operations go through tokio::task::spawn_blocking since the keyring crate
//! is synchronous.

mod keychain;

pub use keychain::{KeychainAccess, KeychainError, Result};
