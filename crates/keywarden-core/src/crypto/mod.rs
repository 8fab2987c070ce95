//! Cryptographic operations for Keywarden.
//!
//! This module provides key derivation and record encryption using
//! well-audited libraries:
//! - **Argon2id**: memory-hard key derivation and master-key verification
//! - **XChaCha20-Poly1305**: per-record authenticated encryption
//!
//! ## Security Model
//!
//! - The master key is never persisted; the only stored artifact derived
//!   from it is a slow, salted verifier hash.
//! - Each record is sealed under a key derived from the master key and a
//!   per-vault salt, with a fresh random nonce per seal and the website
//!   bound as associated data.
//! - Key material is zeroized from memory on drop.
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the vault file
//! - Offline brute-force attacks on the master key
//! - Ciphertext tampering or replay across records
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod key;
pub mod verifier;

pub use key::{derive_key, VaultKey};
