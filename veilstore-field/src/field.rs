//! Transparent read/write adapter between a persistence column and
//! application code.
//!
//! Callers read and write plaintext domain values; the adapter encrypts on
//! the way in and decrypts on the way out. Two generations of stored data
//! must coexist: legacy plaintext rows written before encryption was
//! enabled, and encrypted rows. The read path therefore treats any value
//! that fails decryption as legacy plaintext, and the write path detects
//! already-encrypted values to avoid double encryption on repeated saves.
//!
//! These fallbacks are specific to this adapter. A caller using
//! [`EncryptionEngine`] directly sees hard failures; a caller going through
//! the adapter sees silent degradation to plaintext, which is a
//! confidentiality tradeoff the surrounding system must surface through
//! monitoring of the `warn` events emitted here.

use crate::config::EncryptionConfig;
use crate::error::FieldResult;
use std::sync::Arc;
use tracing::{debug, warn};
use veilstore_crypto::{EncryptionEngine, MasterSecret};

/// Minimum length for the already-encrypted heuristic. The smallest real
/// blob (44 bytes) encodes to 60 base64 characters, so anything at or
/// under this length is plaintext.
const ENCRYPTED_MIN_CHARS: usize = 50;

/// What to do when encryption itself fails on the write path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Store the plaintext and log a warning. Availability over
    /// confidentiality; matches the historical behavior.
    #[default]
    FailOpen,
    /// Propagate the error; nothing is stored.
    FailClosed,
}

/// Field-level adapter that encrypts on write and decrypts on read.
///
/// The tenant id is always `None` on this path: the persistence layer does
/// not supply tenant context. Callers needing tenant-bound keys use the
/// engine directly.
pub struct TransparentField {
    engine: Option<Arc<EncryptionEngine>>,
    policy: WritePolicy,
}

impl TransparentField {
    /// Creates an enabled adapter over a shared engine.
    pub fn new(engine: Arc<EncryptionEngine>) -> Self {
        Self {
            engine: Some(engine),
            policy: WritePolicy::default(),
        }
    }

    /// Creates a disabled adapter: every value passes through unchanged.
    pub fn disabled() -> Self {
        Self {
            engine: None,
            policy: WritePolicy::default(),
        }
    }

    /// Builds an adapter from configuration.
    ///
    /// A disabled feature flag yields a passthrough adapter without
    /// touching the secret; an enabled flag with an empty secret is a
    /// configuration error so the engine can never produce weak keys.
    pub fn from_config(config: &EncryptionConfig) -> FieldResult<Self> {
        if !config.feature_enabled {
            return Ok(Self::disabled());
        }
        let secret = MasterSecret::new(&config.master_secret)?;
        Ok(Self::new(Arc::new(EncryptionEngine::new(secret))))
    }

    /// Sets the write-path failure policy.
    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether this adapter encrypts at all.
    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    /// Prepares a plaintext value for storage.
    ///
    /// Empty values and disabled adapters pass through unchanged. A value
    /// that already looks like one of our blobs (and proves it by
    /// decrypting) is stored as-is, so repeated saves never double-encrypt.
    /// Errors are handled per [`WritePolicy`]; under the default
    /// `FailOpen` this method always returns `Ok`.
    pub fn prepare_for_storage(&self, value: &str) -> FieldResult<String> {
        if value.is_empty() {
            return Ok(value.to_string());
        }
        let Some(engine) = &self.engine else {
            return Ok(value.to_string());
        };

        if looks_encrypted(value) && engine.decrypt(value, None).is_ok() {
            return Ok(value.to_string());
        }

        match engine.encrypt(value.as_bytes(), None) {
            Ok(encrypted) => Ok(encrypted),
            Err(e) => match self.policy {
                WritePolicy::FailOpen => {
                    warn!(error = %e, "field encryption failed, storing plaintext");
                    Ok(value.to_string())
                }
                WritePolicy::FailClosed => Err(e.into()),
            },
        }
    }

    /// Restores a stored value to plaintext.
    ///
    /// Any value that fails decryption or is not valid UTF-8 is assumed to
    /// predate encryption and returned unchanged. That is backward
    /// compatibility with legacy rows, not error suppression; genuine
    /// tampering on this path is indistinguishable from legacy data and
    /// must be caught by monitoring, not here.
    pub fn restore_from_storage(&self, raw: &str) -> String {
        if raw.is_empty() {
            return raw.to_string();
        }
        let Some(engine) = &self.engine else {
            return raw.to_string();
        };

        match engine.decrypt(raw, None) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(value) => value,
                Err(_) => {
                    debug!("decrypted field is not UTF-8, returning stored value as legacy");
                    raw.to_string()
                }
            },
            Err(e) => {
                debug!(error = %e, "field decryption failed, treating as legacy plaintext");
                raw.to_string()
            }
        }
    }
}

impl std::fmt::Debug for TransparentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransparentField")
            .field("enabled", &self.is_enabled())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Required width for a text column that held `original_max` plaintext
/// characters before encryption was enabled.
///
/// Base64 framing inflates values by roughly a third plus the fixed
/// salt/nonce/tag overhead; 1.5x + 100 covers both with headroom.
pub fn encrypted_column_length(original_max: usize) -> usize {
    original_max * 3 / 2 + 100
}

/// Soft heuristic for "this is one of our blobs": long and drawn entirely
/// from the base64 alphabet. A false positive is harmless because the
/// caller confirms with a trial decryption before trusting it.
fn looks_encrypted(value: &str) -> bool {
    value.len() > ENCRYPTED_MIN_CHARS
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}
