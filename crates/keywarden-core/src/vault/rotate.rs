//! Master-key rotation.
//!
//! Every stored credential is decrypted under the current key and sealed
//! again under a key derived from the new master key. The whole pass runs
//! inside one SQLite transaction together with the new KDF salt and
//! verifier: a failure at any record rolls everything back, so the vault
//! on disk is always entirely under one master key.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::key::{derive_key, generate_salt};
use crate::crypto::{cipher, verifier};
use crate::error::{KeywardenError, Result};

use super::store::Vault;

impl Vault {
    /// Re-encrypt all credentials under `new_master_key`.
    ///
    /// Records are processed strictly one at a time; the in-memory active
    /// key switches to the new one only after the transaction commits.
    /// Returns the number of records rotated.
    ///
    /// # Errors
    ///
    /// Returns `KeywardenError::RotationFailed` naming the record that
    /// stopped the pass. Nothing is committed on error: the vault stays
    /// under the current master key.
    pub fn rotate(&mut self, new_master_key: &SecretString) -> Result<usize> {
        if new_master_key.expose_secret().is_empty() {
            return Err(KeywardenError::InvalidInput(
                "Master key cannot be empty".to_string(),
            ));
        }

        let new_salt = generate_salt();
        let new_key = derive_key(new_master_key.expose_secret(), &new_salt)?;
        let new_verifier = verifier::hash_master_key(new_master_key.expose_secret())?;

        let old_key = &self.key;
        let tx = self.conn.transaction()?;

        let records: Vec<(String, Vec<u8>)> = {
            let mut stmt = tx.prepare("SELECT website, ciphertext FROM credentials")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            records
        };

        let total = records.len();
        let now = Utc::now().to_rfc3339();
        for (rotated, (website, ciphertext)) in records.into_iter().enumerate() {
            let resealed = cipher::open(old_key, &website, &ciphertext)
                .and_then(|plaintext| cipher::seal(&new_key, &website, &plaintext))
                .map_err(|source| KeywardenError::RotationFailed {
                    website: website.clone(),
                    rotated,
                    total,
                    source: Box::new(source),
                })?;

            tx.execute(
                "UPDATE credentials SET ciphertext = ?, updated_at = ? WHERE website = ?",
                rusqlite::params![resealed, now, website],
            )
            .map_err(|source| KeywardenError::RotationFailed {
                website: website.clone(),
                rotated,
                total,
                source: Box::new(source.into()),
            })?;
        }

        tx.execute(
            "UPDATE meta SET value = ? WHERE key = 'kdf_salt'",
            [hex::encode(new_salt)],
        )?;
        tx.execute(
            "UPDATE meta SET value = ? WHERE key = 'master_verifier'",
            [new_verifier],
        )?;
        tx.commit()?;

        self.key = new_key;
        Ok(total)
    }
}
