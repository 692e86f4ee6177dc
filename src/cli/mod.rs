// Cofre — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: init, reset-key, add, list, get, update, delete, categories.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Cofre — your personal credential vault, synced to your own partition of
/// a remote document store.
#[derive(Parser, Debug)]
#[command(name = "cofre")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the remote document store.
    #[arg(long, env = "COFRE_REMOTE_URL", global = true)]
    pub remote_url: Option<String>,

    /// Identifier of the signed-in principal. Without it every vault
    /// command fails fast — there is no guest partition.
    #[arg(long, env = "COFRE_TENANT", global = true)]
    pub tenant: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the cipher: create the master secret in the platform
    /// keyring if it does not exist yet.
    Init,

    /// Delete the master secret from the platform keyring.
    /// WARNING: every password sealed under it becomes unreadable.
    ResetKey {
        /// Confirm the reset. Without this flag nothing is deleted.
        #[arg(long)]
        yes: bool,
    },

    /// Add a new access record to the vault.
    Add {
        /// Display name of the login (e.g. "GitHub").
        #[arg(long)]
        name: String,

        /// Category label used for grouping and filtering.
        #[arg(long)]
        category: String,

        /// The password. Sealed before it leaves this process.
        #[arg(long)]
        password: String,

        /// Partner/site domain (e.g. "github.com").
        #[arg(long)]
        domain: Option<String>,

        /// Login email.
        #[arg(long)]
        email: Option<String>,

        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List all access records (passwords stay sealed).
    List {
        /// Only show records of this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one access record by identifier.
    Get {
        /// The record identifier.
        id: String,

        /// Decrypt and print the password instead of [SEALED].
        #[arg(long)]
        reveal: bool,
    },

    /// Overwrite an access record. Reissues its freshness token.
    Update {
        /// The record identifier.
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        domain: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Only apply if the record's freshness token still matches this
        /// previously-read value.
        #[arg(long)]
        if_token: Option<String>,
    },

    /// Permanently delete an access record.
    Delete {
        /// The record identifier.
        id: String,

        /// Confirm the deletion. Without this flag nothing is deleted.
        #[arg(long)]
        yes: bool,
    },

    /// List the distinct categories currently in use.
    Categories,
}
