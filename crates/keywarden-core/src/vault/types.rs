//! Core data types for the vault layer.

use chrono::{DateTime, Utc};

/// Metadata for a vault.
#[derive(Debug, Clone)]
pub struct VaultMetadata {
    /// Format version (e.g., "1")
    pub format_version: String,

    /// When this vault was created
    pub created_at: DateTime<Utc>,
}

/// A stored credential.
///
/// The plaintext password never appears here; `ciphertext` is the sealed
/// blob as persisted (nonce plus authenticated ciphertext).
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Normalized website key (trimmed, ASCII-lowercased)
    pub website: String,

    /// Encrypted password blob under the current master key
    pub ciphertext: Vec<u8>,

    /// When this credential was first saved
    pub created_at: DateTime<Utc>,

    /// When this credential was last written (update or key rotation)
    pub updated_at: DateTime<Utc>,
}
