// Cofre — CLI Command Handlers
//
// Each function handles one CLI subcommand. They coordinate between the
// cipher boundary (platform keyring) and the vault manager talking to the
// remote store. This layer owns all user-facing wording; the manager only
// ever returns typed errors.

use std::sync::Arc;

use crate::cipher::{CipherBoundary, KeyMaterialProvider, KeyringProvider};
use crate::error::CofreError;
use crate::identity::{SessionIdentity, TenantId};
use crate::vault::{
    distinct_categories, AccessRecord, HttpRemoteStore, IdentifiedRecord, RecordId, VaultManager,
};

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub async fn execute(cli: Cli) -> Result<(), CofreError> {
    // Key management runs without a remote store or a signed-in tenant;
    // everything else goes through the vault manager.
    match cli.command {
        Commands::Init => cmd_init(),
        Commands::ResetKey { yes } => cmd_reset_key(yes),
        command => vault_command(cli.remote_url, cli.tenant, command).await,
    }
}

async fn vault_command(
    remote_url: Option<String>,
    tenant: Option<String>,
    command: Commands,
) -> Result<(), CofreError> {
    let manager = build_manager(remote_url, tenant)?;

    match command {
        Commands::Init | Commands::ResetKey { .. } => unreachable!("dispatched in execute"),
        Commands::Add {
            name,
            category,
            password,
            domain,
            email,
            notes,
        } => cmd_add(&manager, name, category, password, domain, email, notes).await,
        Commands::List { category } => cmd_list(&manager, category).await,
        Commands::Get { id, reveal } => cmd_get(&manager, id, reveal).await,
        Commands::Update {
            id,
            name,
            category,
            password,
            domain,
            email,
            notes,
            if_token,
        } => {
            cmd_update(
                &manager, id, name, category, password, domain, email, notes, if_token,
            )
            .await
        }
        Commands::Delete { id, yes } => cmd_delete(&manager, id, yes).await,
        Commands::Categories => cmd_categories(&manager).await,
    }
}

type Manager = VaultManager<HttpRemoteStore, SessionIdentity>;

/// Wire up the manager: keyring-backed cipher, HTTP remote store, and the
/// session identity taken from flags/environment.
fn build_manager(remote_url: Option<String>, tenant: Option<String>) -> Result<Manager, CofreError> {
    let remote_url = remote_url.ok_or_else(|| {
        CofreError::Other("No remote store configured — set --remote-url or COFRE_REMOTE_URL".to_string())
    })?;

    let identity = match tenant {
        Some(t) => SessionIdentity::signed_in(TenantId::new(t)),
        None => SessionIdentity::signed_out(),
    };

    let provider = KeyringProvider::new();
    let cipher = CipherBoundary::new(&provider)?;
    let store = HttpRemoteStore::new(remote_url);

    Ok(VaultManager::new(store, identity, Arc::new(cipher)))
}

fn record_from_args(
    name: String,
    category: String,
    password: String,
    domain: Option<String>,
    email: Option<String>,
    notes: Option<String>,
) -> AccessRecord {
    let mut record = AccessRecord::new(name, category, password);
    record.partner_domain = domain;
    record.email = email;
    record.notes = notes;
    record
}

// ─── Init / Reset-Key ────────────────────────────────────────────────────────

fn cmd_init() -> Result<(), CofreError> {
    let provider = KeyringProvider::new();

    if provider.has_master_secret()? {
        println!("Master secret already present in the platform keyring.");
        return Ok(());
    }

    provider.get_or_create_master_secret()?;
    println!("✓ Master secret created and stored in the platform keyring");
    println!();
    println!("Next: add a record with `cofre add --name <name> --category <category> --password <password>`");

    Ok(())
}

fn cmd_reset_key(yes: bool) -> Result<(), CofreError> {
    if !yes {
        println!("Resetting the key makes every sealed password unreadable.");
        println!("Re-run with --yes to delete the master secret.");
        return Ok(());
    }

    let provider = KeyringProvider::new();
    provider.delete_master_secret()?;
    println!("✓ Master secret deleted from the platform keyring");

    Ok(())
}

// ─── Add ─────────────────────────────────────────────────────────────────────

async fn cmd_add(
    manager: &Manager,
    name: String,
    category: String,
    password: String,
    domain: Option<String>,
    email: Option<String>,
    notes: Option<String>,
) -> Result<(), CofreError> {
    let record = record_from_args(name, category, password, domain, email, notes);
    let created = manager.create(&record).await?;

    println!("✓ {}", created.message);
    println!("  ID:       {}", created.id);
    println!("  Name:     {}", record.name);
    println!("  Category: {}", record.category);

    Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

async fn cmd_list(manager: &Manager, category: Option<String>) -> Result<(), CofreError> {
    let mut records = manager.read_all().await?;

    if let Some(ref wanted) = category {
        records.retain(|item| &item.record.category == wanted);
    }

    if records.is_empty() {
        match category {
            Some(c) => println!("No access records in category '{}'.", c),
            None => {
                println!("No access records stored yet.");
                println!("Add one with: cofre add --name <name> --category <category> --password <password>");
            }
        }
        return Ok(());
    }

    println!("Stored access records ({}):\n", records.len());
    for IdentifiedRecord { id, record } in &records {
        println!(
            "  {} │ {:20} │ {:12} │ {}",
            id,
            record.name,
            record.category,
            record.partner_domain.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

// ─── Get ─────────────────────────────────────────────────────────────────────

async fn cmd_get(manager: &Manager, id: String, reveal: bool) -> Result<(), CofreError> {
    let fetched = manager.read_one(&RecordId::new(id)).await?;
    let record = &fetched.record;

    println!("Access record details:\n");
    println!("  ID:       {}", fetched.id);
    println!("  Name:     {}", record.name);
    println!("  Category: {}", record.category);
    if let Some(ref domain) = record.partner_domain {
        println!("  Domain:   {}", domain);
    }
    if let Some(ref email) = record.email {
        println!("  Email:    {}", email);
    }
    if reveal {
        let plaintext = manager.reveal(record)?;
        println!("  Password: {}", plaintext.as_str());
    } else {
        println!("  Password: [SEALED] (use --reveal to decrypt)");
    }
    if let Some(ref notes) = record.notes {
        println!("  Notes:    {}", notes);
    }
    if let Some(ref token) = record.freshness_token {
        println!("  Token:    {}", token);
    }

    Ok(())
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
async fn cmd_update(
    manager: &Manager,
    id: String,
    name: String,
    category: String,
    password: String,
    domain: Option<String>,
    email: Option<String>,
    notes: Option<String>,
    if_token: Option<String>,
) -> Result<(), CofreError> {
    let id = RecordId::new(id);
    let record = record_from_args(name, category, password, domain, email, notes);

    match if_token {
        Some(token) => {
            manager
                .update_if_fresh(&id, Some(token.as_str()), &record)
                .await?
        }
        None => manager.update(&id, &record).await?,
    }

    println!("✓ Access record {} updated", id);
    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

async fn cmd_delete(manager: &Manager, id: String, yes: bool) -> Result<(), CofreError> {
    let id = RecordId::new(id);

    if !yes {
        println!("Deletion is permanent. Re-run with --yes to delete record {}.", id);
        return Ok(());
    }

    manager.delete(&id).await?;
    println!("✓ Access record {} deleted", id);
    Ok(())
}

// ─── Categories ──────────────────────────────────────────────────────────────

async fn cmd_categories(manager: &Manager) -> Result<(), CofreError> {
    let records = manager.read_all().await?;
    let categories = distinct_categories(records.iter().map(|item| &item.record));

    if categories.is_empty() {
        println!("No categories yet.");
        return Ok(());
    }

    println!("Categories in use ({}):", categories.len());
    for category in &categories {
        println!("  {}", category);
    }

    Ok(())
}
