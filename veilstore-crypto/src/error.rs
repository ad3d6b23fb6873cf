//! Error types for the encryption engine.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// AEAD tag verification failed: tampered data, wrong key, or wrong
    /// tenant context. Carries no detail on purpose.
    #[error("authentication failed (tampered data, wrong key, or wrong tenant)")]
    Authentication,

    /// Input is not a well-formed blob (too short, bad base64, truncated
    /// stream header or chunk).
    #[error("malformed blob: {0}")]
    MalformedBlob(String),

    /// Encryption failed (only reachable for absurdly oversized input).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The engine cannot be constructed or used safely.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error from the streaming path.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
