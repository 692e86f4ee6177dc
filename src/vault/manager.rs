// Cofre — Vault Synchronization Manager
//
// Orchestrates create/read/update/delete against the tenant's remote
// collection. Key design decision: every read returns the password still
// sealed; plaintext exists only transiently, behind `reveal()`. The
// manager is stateless between calls and holds no locks — each operation
// is one remote round trip plus local cipher work.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::cipher::CipherBoundary;
use crate::identity::{IdentityContext, TenantId};

use super::codec;
use super::error::VaultError;
use super::models::{AccessRecord, IdentifiedRecord, RecordId};
use super::remote::RemoteStore;
use super::token::FreshnessTokenIssuer;

/// Result of a successful create: the store-assigned identifier plus a
/// human-readable confirmation for the presentation layer.
#[derive(Debug, Clone)]
pub struct CreatedRecord {
    pub id: RecordId,
    pub message: String,
}

/// The credential vault synchronization manager.
///
/// All collaborators are injected: the remote store, the identity context
/// resolving the tenant partition, and the cipher boundary sealing the
/// password field. The manager never reaches for ambient global state.
pub struct VaultManager<S, I> {
    store: S,
    identity: I,
    cipher: Arc<CipherBoundary>,
    issuer: FreshnessTokenIssuer,
}

impl<S: RemoteStore, I: IdentityContext> VaultManager<S, I> {
    pub fn new(store: S, identity: I, cipher: Arc<CipherBoundary>) -> Self {
        Self {
            store,
            identity,
            cipher,
            issuer: FreshnessTokenIssuer::new(),
        }
    }

    /// Resolve the tenant partition, failing fast when nobody is signed
    /// in. There is no placeholder tenant to fall back to.
    fn tenant(&self) -> Result<TenantId, VaultError> {
        Ok(self.identity.current_tenant()?)
    }

    fn validated(record: &AccessRecord) -> Result<(), VaultError> {
        let missing = record.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VaultError::Validation(missing))
        }
    }

    /// Seal the password and append the record to the tenant's collection.
    /// Returns the assigned identifier so callers can address the record
    /// immediately, without a follow-up `read_all`.
    pub async fn create(&self, record: &AccessRecord) -> Result<CreatedRecord, VaultError> {
        let tenant = self.tenant()?;
        Self::validated(record)?;

        let sealed = self
            .cipher
            .seal(record.password())
            .map_err(VaultError::Encryption)?;
        let wire = codec::to_wire(record, &sealed);

        let id = self
            .store
            .insert(&tenant, wire)
            .await
            .map_err(VaultError::RemoteWrite)?;

        tracing::info!(record_id = %id, "Access record stored");
        Ok(CreatedRecord {
            id,
            message: "Access record stored successfully".to_string(),
        })
    }

    /// Every record of the tenant, in store-defined order, passwords still
    /// sealed. An empty collection is a success, not an error.
    pub async fn read_all(&self) -> Result<Vec<IdentifiedRecord>, VaultError> {
        let tenant = self.tenant()?;

        let docs = self
            .store
            .fetch_all(&tenant)
            .await
            .map_err(VaultError::RemoteRead)?;

        Ok(docs
            .into_iter()
            .map(|(id, doc)| IdentifiedRecord {
                id,
                record: codec::from_wire(doc),
            })
            .collect())
    }

    /// One record by identifier, password still sealed. `NotFound` when
    /// the identifier does not exist in this tenant's partition — which
    /// includes identifiers owned by some other tenant.
    pub async fn read_one(&self, id: &RecordId) -> Result<IdentifiedRecord, VaultError> {
        let tenant = self.tenant()?;

        let doc = self
            .store
            .fetch(&tenant, id)
            .await
            .map_err(VaultError::RemoteRead)?
            .ok_or_else(|| VaultError::NotFound(id.clone()))?;

        Ok(IdentifiedRecord {
            id: id.clone(),
            record: codec::from_wire(doc),
        })
    }

    /// Re-seal the password, reissue the freshness token and write the
    /// partial field set over the existing document.
    pub async fn update(&self, id: &RecordId, record: &AccessRecord) -> Result<(), VaultError> {
        let tenant = self.tenant()?;
        Self::validated(record)?;

        let token = self.issuer.issue();
        let sealed = self
            .cipher
            .seal(record.password())
            .map_err(VaultError::Encryption)?;
        let patch = codec::to_patch(record, &sealed, &token);

        let applied = self
            .store
            .patch(&tenant, id, patch)
            .await
            .map_err(VaultError::RemoteWrite)?;
        if !applied {
            return Err(VaultError::NotFound(id.clone()));
        }

        tracing::info!(record_id = %id, "Access record updated");
        Ok(())
    }

    /// Update guarded by the freshness token the caller read earlier:
    /// fails with `Conflict` when the server-side token no longer matches.
    /// Best-effort read-then-write — the store offers no compare-and-swap,
    /// so a concurrent writer can still slip between the check and the
    /// patch.
    pub async fn update_if_fresh(
        &self,
        id: &RecordId,
        expected_token: Option<&str>,
        record: &AccessRecord,
    ) -> Result<(), VaultError> {
        let current = self.read_one(id).await?;
        if current.record.freshness_token.as_deref() != expected_token {
            return Err(VaultError::Conflict);
        }
        self.update(id, record).await
    }

    /// Permanently remove one record. The identifier is invalid afterwards;
    /// there is no soft delete and no tombstone.
    pub async fn delete(&self, id: &RecordId) -> Result<(), VaultError> {
        let tenant = self.tenant()?;

        let removed = self
            .store
            .remove(&tenant, id)
            .await
            .map_err(VaultError::RemoteWrite)?;
        if !removed {
            return Err(VaultError::NotFound(id.clone()));
        }

        tracing::info!(record_id = %id, "Access record deleted");
        Ok(())
    }

    /// The explicit decrypt step pairing with the sealed-read contract:
    /// open the password of a record returned by `read_one`/`read_all`.
    pub fn reveal(&self, record: &AccessRecord) -> Result<Zeroizing<String>, VaultError> {
        self.cipher
            .open(record.password())
            .map_err(VaultError::Decryption)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
