//! Key derivation using Argon2id.
//!
//! This module derives the record-encryption key from the master key
//! using the Argon2id algorithm, which is memory-hard and resistant to
//! GPU-based attacks.

use argon2::Argon2;
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::{KeywardenError, Result};

/// Argon2id parameters.
///
/// These values balance security and usability:
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1 (single-threaded for simplicity)
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of the derived key in bytes (32 bytes = 256 bits).
const KEY_LENGTH: usize = 32;

/// Length of the per-vault KDF salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// The record-encryption key derived from the master key.
///
/// Key material is securely zeroized from memory when dropped, reducing
/// the window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_LENGTH],
}

impl VaultKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Avoid storing or logging this value; use only for
    /// immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the record-encryption key from a master key and per-vault salt.
///
/// Same master key + salt always produces the same key; a different salt
/// produces a different key, so the salt must be stored with the vault.
///
/// # Errors
///
/// Returns `KeywardenError::InvalidInput` for an empty master key or a
/// short salt, and `KeywardenError::Crypto` if derivation itself fails.
pub fn derive_key(master_key: &str, salt: &[u8]) -> Result<VaultKey> {
    if master_key.is_empty() {
        return Err(KeywardenError::InvalidInput(
            "Master key cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(KeywardenError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| KeywardenError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(master_key.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| KeywardenError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(VaultKey::from_bytes(key_bytes))
}

/// Generate a fresh random KDF salt.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = b"unique-salt-1234567890123456";

        let key1 = derive_key("test-master-key", salt).unwrap();
        let key2 = derive_key("test-master-key", salt).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("test-master-key", b"salt1-1234567890123456").unwrap();
        let key2 = derive_key("test-master-key", b"salt2-1234567890123456").unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_master_key_different_key() {
        let salt = b"fixed-salt-123456789012345";

        let key1 = derive_key("master-key-one", salt).unwrap();
        let key2 = derive_key("master-key-two", salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_master_key_rejected() {
        let result = derive_key("", b"salt-1234567890123456");
        assert!(result.is_err());
    }

    #[test]
    fn test_short_salt_rejected() {
        let result = derive_key("test-master-key", b"short");
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_salt_is_random() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_vault_key_debug_redacts() {
        let key = derive_key("test-master-key", b"salt-1234567890123456").unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
