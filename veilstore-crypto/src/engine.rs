//! The encryption engine: KDF + AEAD + framing composed into the public
//! encrypt/decrypt operations.
//!
//! The engine holds only the immutable master secret and is stateless
//! across calls, so one instance can be shared process-wide behind an
//! `Arc`. It is constructed explicitly by the composition root and passed
//! to collaborators; there is no global.

use crate::cipher;
use crate::error::{CryptoError, CryptoResult};
use crate::frame;
use crate::key::{derive_key, MasterSecret, Salt};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Symmetric authenticated-encryption engine for data at rest.
///
/// Every single-value call uses a fresh random salt and nonce, so the
/// nonce-uniqueness requirement of AES-GCM holds by construction, and the
/// same plaintext encrypts to a different blob every time.
pub struct EncryptionEngine {
    pub(crate) secret: MasterSecret,
}

impl EncryptionEngine {
    /// Creates an engine over a validated master secret.
    pub fn new(secret: MasterSecret) -> Self {
        Self { secret }
    }

    /// Encrypts a value for storage in a text column.
    ///
    /// Returns the base64 encoding of `salt(16) || nonce(12) || ct+tag`,
    /// printable and safe for any text column. The tenant id, when given,
    /// is folded into key derivation but not recorded in the blob; the
    /// caller must supply the same tenant at decrypt time.
    pub fn encrypt(&self, plaintext: &[u8], tenant_id: Option<u64>) -> CryptoResult<String> {
        let salt = Salt::random();
        let nonce = cipher::generate_nonce();
        let key = derive_key(&self.secret, &salt, tenant_id);

        let ciphertext = cipher::seal(&key, &nonce, plaintext)?;
        Ok(STANDARD.encode(frame::frame(&salt, &nonce, &ciphertext)))
    }

    /// Decrypts a base64 blob produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails with [`CryptoError::MalformedBlob`] on bad base64 or a
    /// too-short blob, and [`CryptoError::Authentication`] when the tag
    /// does not verify (tampering, wrong secret, or wrong tenant).
    pub fn decrypt(&self, encoded: &str, tenant_id: Option<u64>) -> CryptoResult<Vec<u8>> {
        let blob = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::MalformedBlob(format!("invalid base64: {e}")))?;

        let (salt, nonce, ciphertext) = frame::unframe(&blob)?;
        let key = derive_key(&self.secret, &salt, tenant_id);

        cipher::open(&key, &nonce, ciphertext)
    }
}

impl std::fmt::Debug for EncryptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionEngine")
            .field("secret", &self.secret)
            .finish()
    }
}
