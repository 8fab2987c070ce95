//! Per-record authenticated encryption.
//!
//! Records are sealed with XChaCha20-Poly1305 under the vault key. Every
//! seal draws a fresh random 24-byte nonce, prepended to the ciphertext,
//! so identical plaintexts produce different blobs. The normalized
//! website is bound as associated data, which ties each blob to its row:
//! a ciphertext moved onto another website fails authentication.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;

use crate::crypto::key::VaultKey;
use crate::error::{KeywardenError, Result};

/// XChaCha20 nonce length in bytes.
const NONCE_LENGTH: usize = 24;

/// Encrypt `plaintext` for the given website.
///
/// Returns an opaque blob laid out as `nonce || ciphertext+tag`.
pub fn seal(key: &VaultKey, website: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = new_cipher(key)?;

    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: website.as_bytes(),
            },
        )
        .map_err(|_| KeywardenError::Crypto("Encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`] for the same website.
///
/// # Errors
///
/// Returns `KeywardenError::Crypto` when the blob is malformed, was
/// sealed under a different key or website, or has been tampered with.
pub fn open(key: &VaultKey, website: &str, blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < NONCE_LENGTH {
        return Err(KeywardenError::Crypto(
            "Stored ciphertext is too short".to_string(),
        ));
    }

    let cipher = new_cipher(key)?;
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LENGTH);

    cipher
        .decrypt(
            XNonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: website.as_bytes(),
            },
        )
        .map_err(|_| {
            KeywardenError::Crypto(
                "Decryption failed; wrong key or corrupted record".to_string(),
            )
        })
}

fn new_cipher(key: &VaultKey) -> Result<XChaCha20Poly1305> {
    XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| KeywardenError::Crypto(format!("Failed to initialize cipher: {}", e)))
}
