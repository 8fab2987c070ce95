//! Prompt helpers and vault opening with bounded retry.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Password};
use secrecy::SecretString;

use keywarden_core::{KeywardenError, Vault};

use crate::config;
use crate::errors::CliError;

/// Maximum interactive attempts for master-key entry.
const MAX_KEY_ATTEMPTS: u32 = 3;

/// Resolve the vault path: `--vault` / env, then config, then default.
pub fn resolve_vault_path(vault_arg: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(value) = vault_arg {
        return Ok(PathBuf::from(value));
    }
    if let Some(config) = config::load_config()? {
        return Ok(PathBuf::from(config.vault.path));
    }
    config::default_vault_path()
}

pub fn missing_vault_message(path: &Path) -> String {
    format!("No vault found at {}", path.display())
}

/// Open the vault, prompting for the master key with bounded retry.
///
/// The `KEYWARDEN_MASTER_KEY` environment variable bypasses prompting and
/// gets a single attempt.
pub fn open_vault(vault_arg: Option<&str>) -> anyhow::Result<Vault> {
    let path = resolve_vault_path(vault_arg)?;
    if !path.exists() {
        CliError::not_found(
            missing_vault_message(&path),
            "Hint: run `keywarden init` to create one.",
        )
        .exit();
    }

    if let Some(master_key) = master_key_from_env() {
        return match Vault::open(&path, &master_key) {
            Ok(vault) => Ok(vault),
            Err(KeywardenError::IncorrectMasterKey) => {
                CliError::auth_failed("Incorrect master key.").exit()
            }
            Err(err) => Err(err.into()),
        };
    }

    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No master key provided and no TTY available. Set KEYWARDEN_MASTER_KEY."
        ));
    }

    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let master_key = prompt_secret("Master key")?;
        match Vault::open(&path, &master_key) {
            Ok(vault) => return Ok(vault),
            Err(KeywardenError::IncorrectMasterKey) => {
                let remaining = MAX_KEY_ATTEMPTS.saturating_sub(attempts);
                if remaining == 0 {
                    CliError::auth_failed_with_hint(
                        "Too many failed master key attempts.",
                        "Hint: If you forgot your master key, the vault cannot be recovered.",
                    )
                    .exit()
                }
                eprintln!(
                    "Incorrect master key. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Prompt for a new master key, entered twice.
///
/// `env_var` bypasses prompting (used by scripts and tests). Mismatched
/// entries re-prompt a bounded number of times rather than recursing
/// forever.
pub fn prompt_new_master_key(env_var: &str) -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return Ok(SecretString::from(value));
        }
    }

    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No master key provided and no TTY available. Set {}.",
            env_var
        ));
    }

    for attempt in 1..=MAX_KEY_ATTEMPTS {
        let first = Password::new()
            .with_prompt("Set a master key for your vault. Do NOT forget this key")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read master key: {}", e))?;
        if first.trim().is_empty() {
            eprintln!("Master key cannot be empty.");
            continue;
        }

        let second = Password::new()
            .with_prompt("Verify master key")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read master key: {}", e))?;
        if first == second {
            return Ok(SecretString::from(first));
        }

        let remaining = MAX_KEY_ATTEMPTS - attempt;
        if remaining > 0 {
            eprintln!(
                "Keys did not match. {} attempt{} remaining.",
                remaining,
                if remaining == 1 { "" } else { "s" }
            );
        }
    }

    Err(anyhow::anyhow!("Too many mismatched master key entries"))
}

/// Read a password for a website from the flag value or a hidden prompt.
pub fn read_password(flag: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = flag {
        if value.is_empty() {
            return Err(anyhow::anyhow!("--password cannot be empty"));
        }
        return Ok(value);
    }

    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No TTY available. Pass the password with --password."
        ));
    }

    for _ in 0..MAX_KEY_ATTEMPTS {
        let value = Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
        if value.is_empty() {
            eprintln!("Please enter a non-empty password.");
            continue;
        }
        return Ok(value);
    }

    Err(anyhow::anyhow!("No password provided"))
}

/// Ask the user to confirm a deletion.
pub fn confirm_delete(website: &str) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No TTY available. Pass --yes to skip the confirmation."
        ));
    }

    Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete the password for {}?",
            website
        ))
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

fn master_key_from_env() -> Option<SecretString> {
    std::env::var("KEYWARDEN_MASTER_KEY")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

fn prompt_secret(prompt: &str) -> anyhow::Result<SecretString> {
    let value = Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read master key: {}", e))?;
    Ok(SecretString::from(value))
}
