// Cofre — Remote Document Store
//
// The seam between the vault manager and the multi-tenant document
// service. `HttpRemoteStore` speaks plain JSON REST against the per-tenant
// collection path `usuarios/{tenant}/acessos`; `MemoryRemoteStore` backs
// tests and embedded use. Both only ever see `WireRecord` documents, whose
// `senha` field is ciphertext by the time it gets here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::identity::TenantId;

use super::codec::{WirePatch, WireRecord};
use super::models::RecordId;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// One per-tenant document collection, addressed by opaque identifiers the
/// store assigns at insert time. Every call is a single round trip; the
/// store guarantees per-document atomicity and nothing across documents.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Append a document to the tenant's collection; returns the assigned
    /// identifier.
    async fn insert(&self, tenant: &TenantId, doc: WireRecord) -> Result<RecordId, RemoteError>;

    /// Fetch one document, `None` when the identifier does not exist in
    /// this tenant's partition.
    async fn fetch(
        &self,
        tenant: &TenantId,
        id: &RecordId,
    ) -> Result<Option<WireRecord>, RemoteError>;

    /// Fetch every document of the tenant, in store-defined order.
    async fn fetch_all(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<(RecordId, WireRecord)>, RemoteError>;

    /// Merge a partial document into an existing one. `Ok(false)` when the
    /// identifier does not exist in this tenant's partition.
    async fn patch(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        patch: WirePatch,
    ) -> Result<bool, RemoteError>;

    /// Permanently remove one document. `Ok(false)` when it did not exist.
    async fn remove(&self, tenant: &TenantId, id: &RecordId) -> Result<bool, RemoteError>;
}

// ─── HTTP Implementation ─────────────────────────────────────────────────────

/// JSON-over-HTTP client for the remote document service.
///
/// Collection: `{base}/usuarios/{tenant}/acessos`
///   POST   collection        → `{"id": "<assigned>"}`
///   GET    collection        → `[{"id": ..., <document fields>}, ...]`
///   GET    collection/{id}   → document, or 404
///   PATCH  collection/{id}   → partial merge, or 404
///   DELETE collection/{id}   → removal, or 404
///
/// No retries and no timeouts of its own: transport-level failures surface
/// as `RemoteError::Transport` and the caller decides whether to retry the
/// whole operation. Dropping the future cancels the in-flight request.
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

#[derive(Deserialize)]
struct ListedDocument {
    id: String,
    #[serde(flatten)]
    doc: WireRecord,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, tenant: &TenantId) -> String {
        format!("{}/usuarios/{}/acessos", self.base_url, tenant)
    }

    fn document_url(&self, tenant: &TenantId, id: &RecordId) -> String {
        format!("{}/{}", self.collection_url(tenant), id)
    }
}

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport(e.to_string())
}

fn bad_status(resp: &reqwest::Response) -> RemoteError {
    RemoteError::Protocol(format!("HTTP {}", resp.status()))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn insert(&self, tenant: &TenantId, doc: WireRecord) -> Result<RecordId, RemoteError> {
        let resp = self
            .client
            .post(self.collection_url(tenant))
            .json(&doc)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(bad_status(&resp));
        }

        let body: InsertResponse = resp
            .json()
            .await
            .map_err(|e| RemoteError::Protocol(format!("invalid insert response: {}", e)))?;
        Ok(RecordId::new(body.id))
    }

    async fn fetch(
        &self,
        tenant: &TenantId,
        id: &RecordId,
    ) -> Result<Option<WireRecord>, RemoteError> {
        let resp = self
            .client
            .get(self.document_url(tenant, id))
            .send()
            .await
            .map_err(transport)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(bad_status(&resp));
        }

        let doc: WireRecord = resp
            .json()
            .await
            .map_err(|e| RemoteError::Protocol(format!("invalid document: {}", e)))?;
        Ok(Some(doc))
    }

    async fn fetch_all(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<(RecordId, WireRecord)>, RemoteError> {
        let resp = self
            .client
            .get(self.collection_url(tenant))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(bad_status(&resp));
        }

        let docs: Vec<ListedDocument> = resp
            .json()
            .await
            .map_err(|e| RemoteError::Protocol(format!("invalid collection listing: {}", e)))?;

        Ok(docs
            .into_iter()
            .map(|d| (RecordId::new(d.id), d.doc))
            .collect())
    }

    async fn patch(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        patch: WirePatch,
    ) -> Result<bool, RemoteError> {
        let resp = self
            .client
            .patch(self.document_url(tenant, id))
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !resp.status().is_success() {
            return Err(bad_status(&resp));
        }
        Ok(true)
    }

    async fn remove(&self, tenant: &TenantId, id: &RecordId) -> Result<bool, RemoteError> {
        let resp = self
            .client
            .delete(self.document_url(tenant, id))
            .send()
            .await
            .map_err(transport)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !resp.status().is_success() {
            return Err(bad_status(&resp));
        }
        Ok(true)
    }
}

// ─── In-Memory Implementation ────────────────────────────────────────────────

/// Tenant-partitioned in-memory store with the same semantics as the
/// remote service: opaque assigned identifiers, per-document atomicity, no
/// cross-tenant visibility. Cloning yields another handle onto the same
/// documents, which is how tests observe writes from outside the manager.
#[derive(Clone, Default)]
pub struct MemoryRemoteStore {
    partitions: Arc<RwLock<HashMap<String, HashMap<String, WireRecord>>>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn insert(&self, tenant: &TenantId, doc: WireRecord) -> Result<RecordId, RemoteError> {
        let id = Uuid::new_v4().to_string();
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(tenant.as_str().to_string())
            .or_default()
            .insert(id.clone(), doc);
        Ok(RecordId::new(id))
    }

    async fn fetch(
        &self,
        tenant: &TenantId,
        id: &RecordId,
    ) -> Result<Option<WireRecord>, RemoteError> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(tenant.as_str())
            .and_then(|docs| docs.get(id.as_str()))
            .cloned())
    }

    async fn fetch_all(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<(RecordId, WireRecord)>, RemoteError> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(tenant.as_str())
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (RecordId::new(id.clone()), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn patch(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        patch: WirePatch,
    ) -> Result<bool, RemoteError> {
        let mut partitions = self.partitions.write().await;
        let Some(doc) = partitions
            .get_mut(tenant.as_str())
            .and_then(|docs| docs.get_mut(id.as_str()))
        else {
            return Ok(false);
        };

        doc.nome = patch.nome;
        doc.categoria = patch.categoria;
        doc.parceiro = patch.parceiro;
        doc.email = patch.email;
        doc.senha = patch.senha;
        doc.descricao = patch.descricao;
        doc.access_token = Some(patch.access_token);
        Ok(true)
    }

    async fn remove(&self, tenant: &TenantId, id: &RecordId) -> Result<bool, RemoteError> {
        let mut partitions = self.partitions.write().await;
        Ok(partitions
            .get_mut(tenant.as_str())
            .map(|docs| docs.remove(id.as_str()).is_some())
            .unwrap_or(false))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> WireRecord {
        WireRecord {
            nome: name.to_string(),
            categoria: "Dev".to_string(),
            parceiro: None,
            email: None,
            senha: "sealed".to_string(),
            descricao: None,
            access_token: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryRemoteStore::new();
        let tenant = TenantId::new("t1");

        let a = store.insert(&tenant, doc("a")).await.unwrap();
        let b = store.insert(&tenant, doc("b")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_fetch_is_tenant_scoped() {
        let store = MemoryRemoteStore::new();
        let id = store.insert(&TenantId::new("t1"), doc("a")).await.unwrap();

        assert!(store
            .fetch(&TenantId::new("t1"), &id)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .fetch(&TenantId::new("t2"), &id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_of_empty_tenant_is_empty() {
        let store = MemoryRemoteStore::new();
        let all = store.fetch_all(&TenantId::new("nobody")).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_patch_merges_and_stamps_token() {
        let store = MemoryRemoteStore::new();
        let tenant = TenantId::new("t1");
        let id = store.insert(&tenant, doc("a")).await.unwrap();

        let patch = WirePatch {
            nome: "a".to_string(),
            categoria: "Work".to_string(),
            parceiro: None,
            email: None,
            senha: "resealed".to_string(),
            descricao: None,
            access_token: "tok-1".to_string(),
        };
        assert!(store.patch(&tenant, &id, patch).await.unwrap());

        let stored = store.fetch(&tenant, &id).await.unwrap().unwrap();
        assert_eq!(stored.categoria, "Work");
        assert_eq!(stored.senha, "resealed");
        assert_eq!(stored.access_token.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_patch_missing_document_reports_false() {
        let store = MemoryRemoteStore::new();
        let patch = WirePatch {
            nome: "x".to_string(),
            categoria: "x".to_string(),
            parceiro: None,
            email: None,
            senha: "x".to_string(),
            descricao: None,
            access_token: "t".to_string(),
        };
        let applied = store
            .patch(&TenantId::new("t1"), &RecordId::new("missing"), patch)
            .await
            .unwrap();
        assert!(!applied);
    }

    #[tokio::test]
    async fn test_remove_is_permanent() {
        let store = MemoryRemoteStore::new();
        let tenant = TenantId::new("t1");
        let id = store.insert(&tenant, doc("a")).await.unwrap();

        assert!(store.remove(&tenant, &id).await.unwrap());
        assert!(store.fetch(&tenant, &id).await.unwrap().is_none());
        assert!(!store.remove(&tenant, &id).await.unwrap());
    }

    #[test]
    fn test_http_store_builds_collection_paths() {
        let store = HttpRemoteStore::new("https://store.example.com/");
        let tenant = TenantId::new("user-1");

        assert_eq!(
            store.collection_url(&tenant),
            "https://store.example.com/usuarios/user-1/acessos"
        );
        assert_eq!(
            store.document_url(&tenant, &RecordId::new("abc")),
            "https://store.example.com/usuarios/user-1/acessos/abc"
        );
    }
}
