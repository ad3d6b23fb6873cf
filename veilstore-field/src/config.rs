//! Configuration surface for field-level encryption.

use serde::Deserialize;

/// Settings consumed by the encryption subsystem.
///
/// The KDF iteration count is intentionally absent: it is a constant of the
/// engine version ([`veilstore_crypto::KDF_ITERATIONS`]), not a tunable.
#[derive(Clone, Deserialize)]
pub struct EncryptionConfig {
    /// Long-lived master secret. Required (and must be non-empty) when the
    /// feature is enabled.
    #[serde(default)]
    pub master_secret: String,

    /// Global gate. When off, field adapters pass values through untouched
    /// and the engine is never constructed.
    #[serde(default)]
    pub feature_enabled: bool,
}

impl std::fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("master_secret", &"[REDACTED]")
            .field("feature_enabled", &self.feature_enabled)
            .finish()
    }
}
