// Cofre — Identity Context
//
// Resolves the authenticated principal whose private partition every vault
// operation is scoped to. There is deliberately no fallback tenant: with
// nobody signed in, operations fail fast with `NotAuthenticated` instead
// of reading or writing a shared partition.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("No authenticated principal — sign in before accessing the vault")]
    NotAuthenticated,
}

/// Stable identifier of an authenticated principal. Owns the tenant
/// partition `usuarios/{tenant}` in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current authenticated principal.
pub trait IdentityContext: Send + Sync {
    /// The signed-in principal's stable identifier, or `NotAuthenticated`.
    fn current_tenant(&self) -> Result<TenantId, IdentityError>;
}

/// Process-local session state. Reads vastly outnumber sign-in/sign-out
/// transitions, so the principal lives in an `ArcSwapOption` and
/// `current_tenant` never takes a lock.
#[derive(Default)]
pub struct SessionIdentity {
    tenant: ArcSwapOption<TenantId>,
}

impl SessionIdentity {
    /// Session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Session pre-authenticated as the given tenant.
    pub fn signed_in(tenant: TenantId) -> Self {
        let session = Self::default();
        session.sign_in(tenant);
        session
    }

    pub fn sign_in(&self, tenant: TenantId) {
        tracing::info!(%tenant, "Principal signed in");
        self.tenant.store(Some(Arc::new(tenant)));
    }

    pub fn sign_out(&self) {
        self.tenant.store(None);
        tracing::info!("Principal signed out");
    }
}

impl IdentityContext for SessionIdentity {
    fn current_tenant(&self) -> Result<TenantId, IdentityError> {
        self.tenant
            .load_full()
            .map(|t| (*t).clone())
            .ok_or(IdentityError::NotAuthenticated)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_fails_fast() {
        let session = SessionIdentity::signed_out();
        assert!(matches!(
            session.current_tenant(),
            Err(IdentityError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_signed_in_resolves_tenant() {
        let session = SessionIdentity::signed_in(TenantId::new("user-123"));
        assert_eq!(session.current_tenant().unwrap().as_str(), "user-123");
    }

    #[test]
    fn test_sign_out_revokes_tenant() {
        let session = SessionIdentity::signed_in(TenantId::new("user-123"));
        session.sign_out();
        assert!(session.current_tenant().is_err());
    }

    #[test]
    fn test_sign_in_replaces_previous_principal() {
        let session = SessionIdentity::signed_in(TenantId::new("alice"));
        session.sign_in(TenantId::new("bob"));
        assert_eq!(session.current_tenant().unwrap().as_str(), "bob");
    }
}
