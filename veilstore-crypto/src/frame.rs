//! Blob framing: `salt(16) || nonce(12) || ciphertext+tag`.
//!
//! Salt and nonce have fixed widths, so the frame needs no length prefixes
//! and `unframe` is a pure slicing operation with no parsing ambiguity.

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{Salt, SALT_SIZE};

/// Minimum well-formed blob: salt + nonce + tag-only ciphertext.
pub const MIN_BLOB_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Bundles salt, nonce, and ciphertext into one self-describing blob.
pub fn frame(salt: &Salt, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(salt.as_bytes());
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(ciphertext);
    blob
}

/// Splits a blob back into `(salt, nonce, ciphertext+tag)`.
///
/// Fails with [`CryptoError::MalformedBlob`] if the blob is shorter than
/// [`MIN_BLOB_SIZE`].
pub fn unframe(blob: &[u8]) -> CryptoResult<(Salt, [u8; NONCE_SIZE], &[u8])> {
    if blob.len() < MIN_BLOB_SIZE {
        return Err(CryptoError::MalformedBlob(format!(
            "blob is {} bytes, minimum is {}",
            blob.len(),
            MIN_BLOB_SIZE
        )));
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&blob[..SALT_SIZE]);

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&blob[SALT_SIZE..SALT_SIZE + NONCE_SIZE]);

    Ok((Salt::from_bytes(salt), nonce, &blob[SALT_SIZE + NONCE_SIZE..]))
}
