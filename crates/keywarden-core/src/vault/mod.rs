//! Encrypted credential store.
//!
//! One vault file holds a `credentials` table of (website, ciphertext)
//! pairs and a `meta` table carrying the format version, the KDF salt and
//! the master-key verifier. Passwords are encrypted per record; see
//! [`crate::crypto`] for the scheme.

mod rotate;
mod store;
mod types;

pub use store::Vault;
pub use types::{CredentialRecord, VaultMetadata};
