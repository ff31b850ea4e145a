//! Error types for activity-vault operations.
//!
//! Low-level cipher and storage APIs return typed errors; the logging facade
//! in `activity::logger` deliberately absorbs them (see that module).

use thiserror::Error;

/// Result type alias for activity-vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors from key management and envelope encryption/decryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Envelope decode failed: {0}")]
    DecodeFailure(String),

    #[error("Encryption failed: {0}")]
    EncryptFailure(String),

    #[error("Decryption failed: {0}")]
    DecryptFailure(String),

    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Value nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

/// Errors from the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Payload serialization failed: {0}")]
    Serialization(String),
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Storage(StorageError::Serialization(err.to_string()))
    }
}
