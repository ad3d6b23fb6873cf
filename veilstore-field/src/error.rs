//! Error types for the field adapter.

use thiserror::Error;
use veilstore_crypto::CryptoError;

/// Result type for field adapter operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur in the field adapter.
///
/// Most crypto failures never surface here: the adapter deliberately
/// degrades to plaintext on the read path and (under the default policy)
/// on the write path. These variants are what remains.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Underlying crypto failure, surfaced only under
    /// [`WritePolicy::FailClosed`](crate::WritePolicy::FailClosed) or at
    /// construction time.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
