//! Keywarden CLI - a local credential vault with a word-based passphrase
//! generator.
//!
//! This is the command-line interface for Keywarden. It provides a
//! user-friendly interface to the core library functionality.

mod cli;
mod config;
mod errors;
mod helpers;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use keywarden_core::vault::CredentialRecord;
use keywarden_core::{generator, KeywardenError, Vault, VERSION};

use cli::{
    AddArgs, Cli, Commands, CompletionsArgs, DeleteArgs, GenerateArgs, GetArgs, ListArgs,
    UpdateArgs,
};
use errors::CliError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let vault_arg = cli.vault.clone();
    let quiet = cli.quiet;

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Init) => run_init(vault_arg.as_deref(), quiet),
        Some(Commands::Add(args)) => run_add(vault_arg.as_deref(), quiet, args),
        Some(Commands::Get(args)) => run_get(vault_arg.as_deref(), args),
        Some(Commands::List(args)) => run_list(vault_arg.as_deref(), quiet, args),
        Some(Commands::Update(args)) => run_update(vault_arg.as_deref(), quiet, args),
        Some(Commands::Delete(args)) => run_delete(vault_arg.as_deref(), quiet, args),
        Some(Commands::Rotate) => run_rotate(vault_arg.as_deref(), quiet),
        Some(Commands::Completions(args)) => run_completions(args),
        None => {
            println!("Keywarden v{}", VERSION);
            println!("\nRun `keywarden --help` for usage information.");
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let loaded_config = config::load_config()?;
    let generator_config = loaded_config.map(|c| c.generator).unwrap_or_default();

    let length = args.length.unwrap_or(generator_config.default_length);
    if length == 0 {
        CliError::invalid_input("Passphrase length must be at least 1.").exit();
    }
    let include_special = args.special || generator_config.special_characters;
    let wordlist = args
        .wordlist
        .or(generator_config.wordlist)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No word list configured. Use --wordlist, set KEYWARDEN_WORDLIST, \
                 or add one to the config file."
            )
        })?;

    let passphrase = generator::generate(length, include_special, Path::new(&wordlist))?;
    println!("{}", passphrase);
    Ok(())
}

fn run_init(vault_arg: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let path = helpers::resolve_vault_path(vault_arg)?;
    if path.exists() {
        return Err(anyhow::anyhow!(
            "A vault already exists at {}",
            path.display()
        ));
    }

    let master_key = helpers::prompt_new_master_key("KEYWARDEN_MASTER_KEY")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Vault::create(&path, &master_key)?;
    write_default_config(&path)?;

    if !quiet {
        println!("Initialized new vault at {}", path.display());
    }
    Ok(())
}

fn run_add(vault_arg: Option<&str>, quiet: bool, args: AddArgs) -> anyhow::Result<()> {
    let mut vault = helpers::open_vault(vault_arg)?;

    // Check before prompting so the user is not asked for a password that
    // would be rejected anyway.
    if vault.lookup(&args.website)?.is_some() {
        CliError::duplicate(format!(
            "A password for {} already exists. To replace it, use the `update` command.",
            args.website
        ))
        .exit();
    }

    let password = helpers::read_password(
        args.password,
        &format!(
            "Please enter the password you would like to save for {}",
            args.website
        ),
    )?;

    match vault.insert(&args.website, &password) {
        Ok(()) => {
            if !quiet {
                println!("Password added!");
            }
            vault.close()?;
            Ok(())
        }
        Err(KeywardenError::DuplicateWebsite(website)) => CliError::duplicate(format!(
            "A password for {} already exists. To replace it, use the `update` command.",
            website
        ))
        .exit(),
        Err(err) => Err(err.into()),
    }
}

fn run_get(vault_arg: Option<&str>, args: GetArgs) -> anyhow::Result<()> {
    let vault = helpers::open_vault(vault_arg)?;

    match vault.fetch(&args.website) {
        Ok(password) => {
            println!("{}", password);
            vault.close()?;
            Ok(())
        }
        Err(KeywardenError::CredentialNotFound(website)) => not_found(&website).exit(),
        Err(err) => Err(err.into()),
    }
}

fn run_list(vault_arg: Option<&str>, quiet: bool, args: ListArgs) -> anyhow::Result<()> {
    let vault = helpers::open_vault(vault_arg)?;
    let records = vault.list()?;

    if args.json {
        let output = serde_json::to_string_pretty(&records_json(&records))?;
        println!("{}", output);
    } else if records.is_empty() {
        if !quiet {
            println!("No passwords in the vault.");
        }
    } else {
        for record in &records {
            println!("{}", record.website);
        }
    }

    vault.close()?;
    Ok(())
}

fn run_update(vault_arg: Option<&str>, quiet: bool, args: UpdateArgs) -> anyhow::Result<()> {
    let mut vault = helpers::open_vault(vault_arg)?;

    if vault.lookup(&args.website)?.is_none() {
        not_found(&args.website).exit();
    }

    let password = helpers::read_password(
        args.password,
        &format!("Please enter a new password for {}", args.website),
    )?;

    match vault.update(&args.website, &password) {
        Ok(()) => {
            if !quiet {
                println!("Password updated!");
            }
            vault.close()?;
            Ok(())
        }
        Err(KeywardenError::CredentialNotFound(website)) => not_found(&website).exit(),
        Err(err) => Err(err.into()),
    }
}

fn run_delete(vault_arg: Option<&str>, quiet: bool, args: DeleteArgs) -> anyhow::Result<()> {
    let mut vault = helpers::open_vault(vault_arg)?;

    if vault.lookup(&args.website)?.is_none() {
        not_found(&args.website).exit();
    }

    if !args.yes && !helpers::confirm_delete(&args.website)? {
        if !quiet {
            println!("Password is safe.");
        }
        vault.close()?;
        return Ok(());
    }

    match vault.delete(&args.website) {
        Ok(()) => {
            if !quiet {
                println!("Password destroyed.");
            }
            vault.close()?;
            Ok(())
        }
        Err(KeywardenError::CredentialNotFound(website)) => not_found(&website).exit(),
        Err(err) => Err(err.into()),
    }
}

fn run_rotate(vault_arg: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let mut vault = helpers::open_vault(vault_arg)?;
    let new_master_key = helpers::prompt_new_master_key("KEYWARDEN_NEW_MASTER_KEY")?;

    let rotated = vault.rotate(&new_master_key)?;
    vault.close()?;

    if !quiet {
        println!(
            "Master key changed! {} credential{} re-encrypted.",
            rotated,
            if rotated == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "keywarden", &mut std::io::stdout());
    Ok(())
}

fn not_found(website: &str) -> CliError {
    CliError::not_found(
        format!("Can't seem to find a password for {}.", website),
        "Hint: `keywarden list` shows the websites in your vault.",
    )
}

fn records_json(records: &[CredentialRecord]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|record| {
            serde_json::json!({
                "website": record.website,
                "created_at": record.created_at.to_rfc3339(),
                "updated_at": record.updated_at.to_rfc3339(),
            })
        })
        .collect()
}

/// Write a config pointing at the new vault, unless one already exists.
fn write_default_config(vault_path: &Path) -> anyhow::Result<()> {
    let config_path = config::default_config_path()?;
    if config_path.exists() {
        return Ok(());
    }
    let config = config::KeywardenConfig::new(PathBuf::from(vault_path));
    config::write_config(&config_path, &config)
}
