//! Error types for Keywarden core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Keywarden operations.
pub type Result<T> = std::result::Result<T, KeywardenError>;

/// Core error type for Keywarden operations.
#[derive(Debug, Error)]
pub enum KeywardenError {
    /// Word list could not be opened or read
    #[error("Cannot read word list {path}: {source}")]
    CorpusUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A credential already exists for the website
    #[error("A credential for {0} already exists")]
    DuplicateWebsite(String),

    /// No credential stored for the website
    #[error("No credential found for {0}")]
    CredentialNotFound(String),

    /// Master key does not match the stored verifier
    #[error("Incorrect master key")]
    IncorrectMasterKey,

    /// Vault file already exists at the target path
    #[error("Vault file already exists")]
    VaultExists,

    /// Vault file not found
    #[error("Vault file not found")]
    VaultNotFound,

    /// Encryption or decryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Key rotation aborted; the transaction was rolled back, so the vault
    /// on disk is still entirely under the previous master key
    #[error(
        "Key rotation failed at {website} after {rotated} of {total} records; \
         no changes were committed"
    )]
    RotationFailed {
        website: String,
        rotated: usize,
        total: usize,
        #[source]
        source: Box<KeywardenError>,
    },

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
