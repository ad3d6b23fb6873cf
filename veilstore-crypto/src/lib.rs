//! Symmetric authenticated encryption for data at rest.
//!
//! This crate is the cryptographic core of Veilstore: values are encrypted
//! before they reach the persistence layer and decrypted after retrieval.
//!
//! - Per-operation keys are derived from a long-lived master secret with
//!   PBKDF2-HMAC-SHA256 (100k iterations), salted per call and optionally
//!   bound to a tenant id.
//! - Payloads are sealed with AES-256-GCM and framed as
//!   `salt(16) || nonce(12) || ciphertext+tag`, base64-encoded for text
//!   columns.
//! - Large files are encrypted as a stream of fixed-size sealed chunks
//!   with a distinct nonce per chunk.
//!
//! The [`EncryptionEngine`] is stateless after construction and `Send +
//! Sync`; build one at the composition root and share it via `Arc`. The
//! tenant id is deliberately not recorded in blobs: decrypting with a
//! different tenant than the one used at encryption time fails tag
//! verification.

mod cipher;
mod engine;
mod error;
mod frame;
mod key;
mod stream;

pub use cipher::{generate_nonce, open, seal, NONCE_SIZE, TAG_SIZE};
pub use engine::EncryptionEngine;
pub use error::{CryptoError, CryptoResult};
pub use frame::{frame, unframe, MIN_BLOB_SIZE};
pub use key::{derive_key, DerivedKey, MasterSecret, Salt, KDF_ITERATIONS, KEY_SIZE, SALT_SIZE};
pub use stream::{DEFAULT_CHUNK_SIZE, STREAM_MAGIC};
