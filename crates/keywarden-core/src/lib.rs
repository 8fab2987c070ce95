//! # Keywarden Core
//!
//! Core library for Keywarden - a local credential vault with a
//! word-based passphrase generator.
//!
//! This crate provides the domain logic independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **corpus**: word list loading and the word-length line index
//! - **generator**: length-bounded word sampling and passphrase synthesis
//! - **crypto**: key derivation, record cipher, master-key verifier
//! - **vault**: encrypted credential store and master-key rotation

pub mod corpus;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod vault;

pub use error::{KeywardenError, Result};
pub use vault::Vault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
