//! Transparent field-level encryption for the Veilstore persistence layer.
//!
//! The persistence layer calls [`TransparentField::prepare_for_storage`]
//! before writing a column and [`TransparentField::restore_from_storage`]
//! after reading it; application code above never sees ciphertext. The
//! adapter is built once from [`EncryptionConfig`] at the composition root
//! and tolerates both encrypted rows and legacy plaintext rows written
//! before the feature was enabled.

mod config;
mod error;
mod field;

pub use config::EncryptionConfig;
pub use error::{FieldError, FieldResult};
pub use field::{encrypted_column_length, TransparentField, WritePolicy};
