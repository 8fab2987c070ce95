//! Persisted master-key verifier.
//!
//! A slow, salted one-way hash of the master key is the only artifact
//! stored to authenticate later sessions; the key itself is never
//! persisted. Hashes are Argon2id in PHC string format, which embeds the
//! salt and parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{KeywardenError, Result};

/// Hash a master key for storage as the vault's verifier.
pub fn hash_master_key(master_key: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(master_key.as_bytes(), &salt)
        .map_err(|e| KeywardenError::Crypto(format!("Failed to hash master key: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a candidate master key against a stored verifier.
///
/// Returns `Ok(false)` on a mismatch; errors only when the stored
/// verifier itself is unusable.
pub fn verify_master_key(master_key: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| KeywardenError::Crypto(format!("Stored verifier is invalid: {}", e)))?;

    match Argon2::default().verify_password(master_key.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(KeywardenError::Crypto(format!(
            "Verifier check failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let verifier = hash_master_key("correct horse battery").unwrap();
        assert!(verify_master_key("correct horse battery", &verifier).unwrap());
    }

    #[test]
    fn test_wrong_key_does_not_verify() {
        let verifier = hash_master_key("correct horse battery").unwrap();
        assert!(!verify_master_key("incorrect horse", &verifier).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let verifier1 = hash_master_key("same key").unwrap();
        let verifier2 = hash_master_key("same key").unwrap();
        assert_ne!(verifier1, verifier2);
    }

    #[test]
    fn test_garbage_verifier_errors() {
        let result = verify_master_key("anything", "not-a-phc-string");
        assert!(matches!(result, Err(KeywardenError::Crypto(_))));
    }
}
