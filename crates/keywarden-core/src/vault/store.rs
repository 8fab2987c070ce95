//! SQLite-backed credential store.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::key::{derive_key, generate_salt, VaultKey};
use crate::crypto::{cipher, verifier};
use crate::error::{KeywardenError, Result};
use crate::vault::types::{CredentialRecord, VaultMetadata};

/// Current vault format version.
const FORMAT_VERSION: &str = "1";

/// An open credential vault.
///
/// Holds the SQLite connection and the record-encryption key for the
/// session. The key exists only in memory and is zeroized when the vault
/// is closed or dropped.
pub struct Vault {
    pub(super) conn: Connection,
    pub(super) key: VaultKey,
}

impl Vault {
    /// Create a new vault file protected by `master_key`.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::VaultExists` if a file is already present
    /// at `path`.
    pub fn create(path: &Path, master_key: &SecretString) -> Result<()> {
        if path.exists() {
            return Err(KeywardenError::VaultExists);
        }
        if master_key.expose_secret().is_empty() {
            return Err(KeywardenError::InvalidInput(
                "Master key cannot be empty".to_string(),
            ));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE credentials (
                website TEXT NOT NULL COLLATE NOCASE UNIQUE,
                ciphertext BLOB NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        let salt = generate_salt();
        let master_verifier = verifier::hash_master_key(master_key.expose_secret())?;
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["format_version", FORMAT_VERSION],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["created_at", &created_at],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["kdf_salt", &hex::encode(salt)],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["master_verifier", &master_verifier],
        )?;

        Ok(())
    }

    /// Open an existing vault.
    ///
    /// The candidate master key is checked against the stored verifier
    /// before the record-encryption key is derived, so a wrong key fails
    /// here rather than producing garbage ciphertexts later.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::VaultNotFound` if `path` does not exist
    /// and `KeywardenError::IncorrectMasterKey` on a verifier mismatch.
    pub fn open(path: &Path, master_key: &SecretString) -> Result<Self> {
        if !path.exists() {
            return Err(KeywardenError::VaultNotFound);
        }

        let conn = Connection::open(path)?;

        let stored = Self::meta_value(&conn, "master_verifier")?;
        if !verifier::verify_master_key(master_key.expose_secret(), &stored)? {
            return Err(KeywardenError::IncorrectMasterKey);
        }

        let salt_hex = Self::meta_value(&conn, "kdf_salt")?;
        let salt = hex::decode(&salt_hex)
            .map_err(|e| KeywardenError::Storage(format!("Invalid KDF salt in metadata: {}", e)))?;
        let key = derive_key(master_key.expose_secret(), &salt)?;

        Ok(Self { conn, key })
    }

    /// Close the vault, dropping the in-memory key.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_conn, source)| KeywardenError::Sqlite { source })
    }

    /// Vault metadata.
    pub fn metadata(&self) -> Result<VaultMetadata> {
        let format_version = Self::meta_value(&self.conn, "format_version")?;
        let created_at = parse_timestamp(&Self::meta_value(&self.conn, "created_at")?)?;
        Ok(VaultMetadata {
            format_version,
            created_at,
        })
    }

    /// Case-insensitive lookup of a stored credential.
    pub fn lookup(&self, website: &str) -> Result<Option<CredentialRecord>> {
        let normalized = normalize_website(website)?;
        let row = self
            .conn
            .query_row(
                "SELECT website, ciphertext, created_at, updated_at FROM credentials WHERE website = ?",
                [&normalized],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some(parts) => Ok(Some(record_from_row(parts)?)),
            None => Ok(None),
        }
    }

    /// Encrypt and store a password for a new website.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::DuplicateWebsite` if a credential already
    /// exists for the normalized website.
    pub fn insert(&mut self, website: &str, password: &str) -> Result<()> {
        let normalized = normalize_website(website)?;
        validate_password(password)?;

        if self.lookup(&normalized)?.is_some() {
            return Err(KeywardenError::DuplicateWebsite(normalized));
        }

        let ciphertext = cipher::seal(&self.key, &normalized, password.as_bytes())?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO credentials (website, ciphertext, created_at, updated_at) VALUES (?, ?, ?, ?)",
            rusqlite::params![normalized, ciphertext, now, now],
        )?;
        Ok(())
    }

    /// Decrypt and return the password stored for a website.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::CredentialNotFound` when no record exists.
    pub fn fetch(&self, website: &str) -> Result<String> {
        let normalized = normalize_website(website)?;
        let record = self
            .lookup(&normalized)?
            .ok_or_else(|| KeywardenError::CredentialNotFound(normalized.clone()))?;

        let plaintext = cipher::open(&self.key, &record.website, &record.ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| {
            KeywardenError::Crypto("Decrypted password is not valid UTF-8".to_string())
        })
    }

    /// Re-encrypt and store a new password for an existing website.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::CredentialNotFound` when no record exists.
    pub fn update(&mut self, website: &str, password: &str) -> Result<()> {
        let normalized = normalize_website(website)?;
        validate_password(password)?;

        let ciphertext = cipher::seal(&self.key, &normalized, password.as_bytes())?;
        let changed = self.conn.execute(
            "UPDATE credentials SET ciphertext = ?, updated_at = ? WHERE website = ?",
            rusqlite::params![ciphertext, Utc::now().to_rfc3339(), normalized],
        )?;
        if changed == 0 {
            return Err(KeywardenError::CredentialNotFound(normalized));
        }
        Ok(())
    }

    /// Delete the credential for a website.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::CredentialNotFound` when no record exists;
    /// the store is left unchanged.
    pub fn delete(&mut self, website: &str) -> Result<()> {
        let normalized = normalize_website(website)?;
        let changed = self
            .conn
            .execute("DELETE FROM credentials WHERE website = ?", [&normalized])?;
        if changed == 0 {
            return Err(KeywardenError::CredentialNotFound(normalized));
        }
        Ok(())
    }

    /// All stored credentials.
    ///
    /// Rows are ordered by website for stable output; callers must not
    /// rely on any particular order.
    pub fn list(&self) -> Result<Vec<CredentialRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT website, ciphertext, created_at, updated_at FROM credentials ORDER BY website",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(record_from_row(row?)?);
        }
        Ok(records)
    }

    pub(super) fn meta_value(conn: &Connection, key: &str) -> Result<String> {
        conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or_else(|| KeywardenError::Storage(format!("Metadata key missing: {}", key)))
    }
}

/// Normalized form of a website key: trimmed, ASCII-lowercased.
///
/// ASCII folding matches SQLite's NOCASE collation, so the associated
/// data bound at encryption time agrees with the stored row regardless of
/// the caller's casing.
pub(super) fn normalize_website(website: &str) -> Result<String> {
    let normalized = website.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(KeywardenError::InvalidInput(
            "Website cannot be empty".to_string(),
        ));
    }
    Ok(normalized)
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(KeywardenError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn record_from_row(
    (website, ciphertext, created_at, updated_at): (String, Vec<u8>, String, String),
) -> Result<CredentialRecord> {
    Ok(CredentialRecord {
        website,
        ciphertext,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| KeywardenError::Storage(format!("Invalid timestamp: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_website_trims_and_lowercases() {
        assert_eq!(normalize_website("  Example.COM ").unwrap(), "example.com");
    }

    #[test]
    fn test_normalize_website_rejects_empty() {
        assert!(normalize_website("   ").is_err());
        assert!(normalize_website("").is_err());
    }
}
