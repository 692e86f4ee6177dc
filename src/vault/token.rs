// Cofre — Freshness Token Issuer
//
// Stamps a fresh opaque value onto every update. The token is a
// "this record changed" marker only — the store offers no compare-and-swap,
// so it carries no concurrency-control semantics.

use uuid::Uuid;

#[derive(Debug, Default)]
pub struct FreshnessTokenIssuer;

impl FreshnessTokenIssuer {
    pub fn new() -> Self {
        Self
    }

    /// A fresh opaque token, distinct per invocation.
    pub fn issue(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
