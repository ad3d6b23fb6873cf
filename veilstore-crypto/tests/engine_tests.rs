use base64::{engine::general_purpose::STANDARD, Engine};
use veilstore_crypto::{
    derive_key, unframe, CryptoError, EncryptionEngine, MasterSecret, Salt, MIN_BLOB_SIZE,
};

fn engine() -> EncryptionEngine {
    EncryptionEngine::new(MasterSecret::new("unit-test-master-secret").unwrap())
}

// ── Round trips ──────────────────────────────────────────────────

#[test]
fn encrypt_decrypt_roundtrip() {
    let engine = engine();
    let encrypted = engine.encrypt(b"Hello, World!", None).unwrap();
    let decrypted = engine.decrypt(&encrypted, None).unwrap();
    assert_eq!(decrypted, b"Hello, World!");
}

#[test]
fn encrypt_decrypt_empty() {
    let engine = engine();
    let encrypted = engine.encrypt(b"", None).unwrap();
    assert_eq!(engine.decrypt(&encrypted, None).unwrap(), b"");
}

#[test]
fn encrypt_decrypt_single_byte() {
    let engine = engine();
    let encrypted = engine.encrypt(b"x", None).unwrap();
    assert_eq!(engine.decrypt(&encrypted, None).unwrap(), b"x");
}

#[test]
fn encrypt_decrypt_large_data() {
    let engine = engine();
    let plaintext: Vec<u8> = (0..2 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let encrypted = engine.encrypt(&plaintext, None).unwrap();
    assert_eq!(engine.decrypt(&encrypted, None).unwrap(), plaintext);
}

#[test]
fn same_plaintext_produces_different_blobs() {
    let engine = engine();
    let e1 = engine.encrypt(b"Same", None).unwrap();
    let e2 = engine.encrypt(b"Same", None).unwrap();
    assert_ne!(e1, e2);
    assert_eq!(engine.decrypt(&e1, None).unwrap(), b"Same");
    assert_eq!(engine.decrypt(&e2, None).unwrap(), b"Same");
}

#[test]
fn output_is_printable_base64() {
    let engine = engine();
    let encrypted = engine.encrypt(b"anything at all", None).unwrap();
    assert!(encrypted
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='));
}

// ── Tamper detection ─────────────────────────────────────────────

#[test]
fn flipped_ciphertext_bit_fails_authentication() {
    let engine = engine();
    let encrypted = engine.encrypt(b"Secret payload", None).unwrap();
    let mut blob = STANDARD.decode(&encrypted).unwrap();

    // First ciphertext byte, past the 28-byte salt+nonce header.
    blob[28] ^= 0x01;
    let tampered = STANDARD.encode(&blob);
    assert!(matches!(
        engine.decrypt(&tampered, None),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn flipped_tag_bit_fails_authentication() {
    let engine = engine();
    let encrypted = engine.encrypt(b"Secret payload", None).unwrap();
    let mut blob = STANDARD.decode(&encrypted).unwrap();

    let last = blob.len() - 1;
    blob[last] ^= 0x80;
    let tampered = STANDARD.encode(&blob);
    assert!(matches!(
        engine.decrypt(&tampered, None),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn wrong_secret_fails_authentication() {
    let e1 = engine();
    let e2 = EncryptionEngine::new(MasterSecret::new("a different secret").unwrap());
    let encrypted = e1.encrypt(b"Secret", None).unwrap();
    assert!(matches!(
        e2.decrypt(&encrypted, None),
        Err(CryptoError::Authentication)
    ));
}

// ── Malformed input ──────────────────────────────────────────────

#[test]
fn short_blob_is_malformed() {
    let engine = engine();
    for len in [0, 1, 27, 28, MIN_BLOB_SIZE - 1] {
        let short = STANDARD.encode(vec![0u8; len]);
        assert!(
            matches!(
                engine.decrypt(&short, None),
                Err(CryptoError::MalformedBlob(_))
            ),
            "blob of {len} bytes should be malformed"
        );
    }
}

#[test]
fn invalid_base64_is_malformed() {
    let engine = engine();
    assert!(matches!(
        engine.decrypt("!!!not-base64!!!", None),
        Err(CryptoError::MalformedBlob(_))
    ));
}

#[test]
fn unframe_rejects_short_input() {
    assert!(matches!(
        unframe(&[0u8; MIN_BLOB_SIZE - 1]),
        Err(CryptoError::MalformedBlob(_))
    ));
    assert!(unframe(&[0u8; MIN_BLOB_SIZE]).is_ok());
}

// ── Tenant binding ───────────────────────────────────────────────

#[test]
fn tenant_roundtrip() {
    let engine = engine();
    let encrypted = engine.encrypt(b"tenant data", Some(42)).unwrap();
    assert_eq!(engine.decrypt(&encrypted, Some(42)).unwrap(), b"tenant data");
}

#[test]
fn wrong_tenant_fails_authentication() {
    let engine = engine();
    let encrypted = engine.encrypt(b"tenant data", Some(42)).unwrap();
    assert!(matches!(
        engine.decrypt(&encrypted, Some(43)),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn missing_tenant_fails_authentication() {
    let engine = engine();
    let encrypted = engine.encrypt(b"tenant data", Some(42)).unwrap();
    assert!(matches!(
        engine.decrypt(&encrypted, None),
        Err(CryptoError::Authentication)
    ));
}

// ── Key derivation ───────────────────────────────────────────────

#[test]
fn derivation_is_deterministic() {
    let secret = MasterSecret::new("determinism").unwrap();
    let salt = Salt::from_bytes([7u8; 16]);
    let k1 = derive_key(&secret, &salt, Some(9));
    let k2 = derive_key(&secret, &salt, Some(9));
    assert_eq!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn tenant_changes_derived_key() {
    let secret = MasterSecret::new("determinism").unwrap();
    let salt = Salt::from_bytes([7u8; 16]);
    let none = derive_key(&secret, &salt, None);
    let some = derive_key(&secret, &salt, Some(1));
    assert_ne!(none.as_bytes(), some.as_bytes());
}

#[test]
fn salt_changes_derived_key() {
    let secret = MasterSecret::new("determinism").unwrap();
    let k1 = derive_key(&secret, &Salt::from_bytes([1u8; 16]), None);
    let k2 = derive_key(&secret, &Salt::from_bytes([2u8; 16]), None);
    assert_ne!(k1.as_bytes(), k2.as_bytes());
}

// ── Configuration ────────────────────────────────────────────────

#[test]
fn empty_master_secret_is_rejected() {
    assert!(matches!(
        MasterSecret::new(""),
        Err(CryptoError::Configuration(_))
    ));
}

#[test]
fn debug_output_redacts_secret() {
    let engine = engine();
    let debug = format!("{engine:?}");
    assert!(debug.contains("REDACTED"));
    assert!(!debug.contains("unit-test-master-secret"));
}

// ── Concrete scenario ────────────────────────────────────────────

#[test]
fn customer_id_scenario() {
    let engine = engine();
    let encrypted = engine.encrypt(b"cus_test_encryption_12345", None).unwrap();
    assert!(encrypted.len() > 50);
    assert_eq!(
        engine.decrypt(&encrypted, None).unwrap(),
        b"cus_test_encryption_12345"
    );
}
