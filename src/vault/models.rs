// Cofre — Access record models
//
// SECURITY: the `password` field is intentionally private and redacted
// from Debug and Display output. Inside the manager it holds plaintext on
// the way into a create/update and ciphertext after a read; either way it
// must never reach a log sink.

use std::fmt;

/// Opaque, store-assigned identifier of one persisted access record,
/// stable for the record's lifetime and unique within its tenant partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One login record of the vault. Required fields: `name`, `category` and
/// the password; the rest may stay unset and is then omitted on the wire.
#[derive(Clone)]
pub struct AccessRecord {
    pub name: String,
    pub category: String,
    pub partner_domain: Option<String>,
    pub email: Option<String>,
    /// Plaintext before a create/update, ciphertext after a read —
    /// never printed, logged, or Debug-displayed either way.
    password: String,
    pub notes: Option<String>,
    /// Manager-assigned on update; not user-editable.
    pub freshness_token: Option<String>,
}

impl AccessRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            partner_domain: None,
            email: None,
            password: password.into(),
            notes: None,
            freshness_token: None,
        }
    }

    /// Access the raw password field (plaintext or sealed, depending on
    /// which side of the vault boundary this record came from).
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Names of required fields that are empty, in declaration order.
    /// An empty result means the record is valid for create/update.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.category.is_empty() {
            missing.push("category");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

/// Custom Debug that never reveals the password field.
impl fmt::Debug for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessRecord")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("partner_domain", &self.partner_domain)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("notes", &self.notes)
            .field("freshness_token", &self.freshness_token)
            .finish()
    }
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

/// What read operations return and what list UIs key their items by.
#[derive(Debug, Clone)]
pub struct IdentifiedRecord {
    pub id: RecordId,
    pub record: AccessRecord,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
