// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the Solace conversation backend.
//!
//! Provider failures are recovered locally by the cascade and only surface
//! when the terminal builtin stage is unreachable. Auth and storage failures
//! always surface to the caller; decryption failures are never swallowed
//! since they imply key mismatch or data loss.

use thiserror::Error;

/// Authentication and authorization failures.
///
/// Surfaced to the caller, never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token's expiry timestamp is in the past.
    #[error("token expired")]
    Expired,

    /// The token structure or signature did not parse or verify.
    #[error("malformed token")]
    Malformed,

    /// The token was signed with key material the authority does not hold
    /// (e.g., issued before a key rotation).
    #[error("token signed with unknown key")]
    UnknownKey,

    /// The token appears in the configured revocation list.
    #[error("token revoked")]
    Revoked,

    /// Username/password did not match a known account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has been disabled since issuance.
    #[error("account disabled")]
    AccountDisabled,

    /// The authenticated user does not own the requested resource.
    #[error("not authorized for this resource")]
    Forbidden,
}

/// Persistence failures from the encrypted session store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The ciphertext did not authenticate under the configured key.
    /// Implies key rotation without migration or on-disk corruption.
    #[error("decryption failed: wrong key or corrupted data")]
    Decryption,

    /// Key setup or sealing failed. Distinct from [`StorageError::Decryption`],
    /// which specifically means existing data could not be read back.
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// No live session with the given id (missing, deleted, or expired).
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// No message with the given id among the session's retained messages.
    #[error("message not found: {0}")]
    MessageNotFound(String),

    /// No account record with the given id.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Filesystem error reading or writing a blob.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Session payload failed to (de)serialize.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The primary error type used across Solace crates.
#[derive(Debug, Error)]
pub enum SolaceError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication/authorization failures.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Encrypted store failures.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// LLM provider failures (timeout, quota, malformed payload).
    /// Recovered by cascade advance; fatal only past the terminal stage.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed or oversized caller input. No side effects performed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolaceError {
    /// Construct a provider error from a message with no source.
    pub fn provider(message: impl Into<String>) -> Self {
        SolaceError::Provider {
            message: message.into(),
            source: None,
        }
    }
}
