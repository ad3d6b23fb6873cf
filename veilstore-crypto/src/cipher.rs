//! Authenticated encryption using AES-256-GCM.
//!
//! `seal`/`open` are thin, pure wrappers over the AEAD primitive: one key,
//! one nonce, one buffer. Nonce management lives in the engine, which is
//! responsible for never reusing a (key, nonce) pair across plaintexts.

use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

/// Size of nonce in bytes (96 bits for AES-GCM).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Generates a random nonce.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypts `plaintext` under `(key, nonce)`.
///
/// Returns ciphertext with the 16-byte authentication tag appended, so the
/// output is always `plaintext.len() + 16` bytes. No associated data is
/// bound in this format version.
pub fn seal(key: &DerivedKey, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("plaintext too large for AES-GCM".to_string()))
}

/// Decrypts `ciphertext` (with trailing tag) under `(key, nonce)`.
///
/// Fails with [`CryptoError::Authentication`] if the tag does not verify;
/// corrupted plaintext is never returned.
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}
