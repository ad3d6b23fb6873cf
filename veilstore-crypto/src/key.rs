//! Key material and derivation.
//!
//! Per-operation keys are derived from the long-lived master secret with
//! PBKDF2-HMAC-SHA256. The salt travels inside the blob; the tenant id does
//! not, so decryption must be given the same tenant the caller encrypted
//! with.

use crate::error::{CryptoError, CryptoResult};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of derived encryption keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of KDF salt in bytes.
pub const SALT_SIZE: usize = 16;

/// PBKDF2 iteration count. Fixed by the engine version: changing it changes
/// every derived key, so existing blobs would stop decrypting.
pub const KDF_ITERATIONS: u32 = 100_000;

/// The long-lived master secret, supplied by configuration at startup.
///
/// Read-only after construction and never stored alongside ciphertext.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    bytes: Vec<u8>,
}

impl MasterSecret {
    /// Creates a master secret from configuration-supplied bytes.
    ///
    /// An empty secret is rejected: deriving keys from it would silently
    /// produce weak ciphertext.
    pub fn new(secret: impl AsRef<[u8]>) -> CryptoResult<Self> {
        let bytes = secret.as_ref();
        if bytes.is_empty() {
            return Err(CryptoError::Configuration(
                "master secret must not be empty".to_string(),
            ));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A derived encryption key with automatic zeroization on drop.
///
/// Ephemeral: exists only for the duration of one encrypt/decrypt call and
/// is never cached or persisted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Creates a derived key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Salt for key derivation. Random per operation, carried in the blob.
#[derive(Clone, Debug)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// Derives a per-operation key from the master secret.
///
/// The input key material is the master secret with the tenant id appended
/// as its ASCII decimal form (nothing appended when absent), so the same
/// `(salt, tenant_id)` pair always yields the same key. Deterministic and
/// infallible: salt length is enforced by the type.
pub fn derive_key(secret: &MasterSecret, salt: &Salt, tenant_id: Option<u64>) -> DerivedKey {
    let mut ikm = secret.as_bytes().to_vec();
    if let Some(id) = tenant_id {
        ikm.extend_from_slice(id.to_string().as_bytes());
    }

    let mut key_bytes = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(&ikm, salt.as_bytes(), KDF_ITERATIONS, &mut key_bytes);
    ikm.zeroize();

    DerivedKey::from_bytes(key_bytes)
}
