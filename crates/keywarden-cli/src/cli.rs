use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use keywarden_core::VERSION;

/// Keywarden - a local credential vault with a word-based passphrase generator
#[derive(Parser)]
#[command(name = "keywarden")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(long, global = true, env = "KEYWARDEN_VAULT")]
    pub vault: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `generate` command
#[derive(Args)]
pub struct GenerateArgs {
    /// Desired passphrase length in characters
    #[arg(value_name = "LENGTH")]
    pub length: Option<usize>,

    /// Include special characters
    #[arg(short, long)]
    pub special: bool,

    /// Word list file, one word per line, sorted ascending by length
    #[arg(short, long, env = "KEYWARDEN_WORDLIST")]
    pub wordlist: Option<String>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Website to save a password for
    #[arg(value_name = "WEBSITE")]
    pub website: String,

    /// Password value (overrides the interactive prompt)
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `get` command
#[derive(Args)]
pub struct GetArgs {
    /// Website to look up
    #[arg(value_name = "WEBSITE")]
    pub website: String,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `update` command
#[derive(Args)]
pub struct UpdateArgs {
    /// Website to update
    #[arg(value_name = "WEBSITE")]
    pub website: String,

    /// New password value (overrides the interactive prompt)
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Website to delete
    #[arg(value_name = "WEBSITE")]
    pub website: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a random passphrase
    Generate(GenerateArgs),

    /// Initialize a new encrypted vault
    Init,

    /// Save a password for a website
    Add(AddArgs),

    /// Retrieve the password for a website
    Get(GetArgs),

    /// List all websites in the vault
    List(ListArgs),

    /// Update the password for a website
    Update(UpdateArgs),

    /// Delete the password for a website
    Delete(DeleteArgs),

    /// Change the vault master key, re-encrypting every credential
    Rotate,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
