// Cofre — Record Codec
//
// Maps between the in-memory `AccessRecord` and the document schema of the
// remote store. The wire field names are the storage schema's Portuguese
// ones and are binding; unset optional fields are omitted rather than
// written as empty strings. The codec moves the `senha` ciphertext through
// unchanged in both directions — sealing and opening belong to the cipher
// boundary, not here.

use serde::{Deserialize, Serialize};

use super::models::AccessRecord;

/// Full document as stored under `usuarios/{tenant}/acessos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    pub nome: String,
    pub categoria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parceiro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Always ciphertext. A plaintext password must never reach this field.
    pub senha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(
        default,
        rename = "accessToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,
}

/// Partial document written by Update: all six mutable fields plus the
/// freshly issued freshness token. Unlike creation, unset optionals are
/// written as explicit nulls — the merge must clear a field the caller
/// removed, on every backend, not keep its stale value.
#[derive(Debug, Clone, Serialize)]
pub struct WirePatch {
    pub nome: String,
    pub categoria: String,
    pub parceiro: Option<String>,
    pub email: Option<String>,
    pub senha: String,
    pub descricao: Option<String>,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Encode a record for creation, substituting the sealed password.
/// Creation leaves the freshness token unset — only an update stamps one,
/// so a record round-tripped from a read never smuggles its old token
/// onto a brand-new document.
pub fn to_wire(record: &AccessRecord, sealed_password: &str) -> WireRecord {
    WireRecord {
        nome: record.name.clone(),
        categoria: record.category.clone(),
        parceiro: record.partner_domain.clone(),
        email: record.email.clone(),
        senha: sealed_password.to_string(),
        descricao: record.notes.clone(),
        access_token: None,
    }
}

/// Encode the partial field set for an update.
pub fn to_patch(record: &AccessRecord, sealed_password: &str, token: &str) -> WirePatch {
    WirePatch {
        nome: record.name.clone(),
        categoria: record.category.clone(),
        parceiro: record.partner_domain.clone(),
        email: record.email.clone(),
        senha: sealed_password.to_string(),
        descricao: record.notes.clone(),
        access_token: token.to_string(),
    }
}

/// Decode a stored document. The password stays sealed; opening it is an
/// explicit later step.
pub fn from_wire(wire: WireRecord) -> AccessRecord {
    let mut record = AccessRecord::new(wire.nome, wire.categoria, wire.senha);
    record.partner_domain = wire.parceiro;
    record.email = wire.email;
    record.notes = wire.descricao;
    record.freshness_token = wire.access_token;
    record
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names_match_storage_schema() {
        let mut record = AccessRecord::new("GitHub", "Dev", "ignored");
        record.partner_domain = Some("github.com".to_string());
        record.email = Some("dev@example.com".to_string());
        record.notes = Some("work account".to_string());

        let json = serde_json::to_value(to_wire(&record, "c1ph3r")).unwrap();
        assert_eq!(json["nome"], "GitHub");
        assert_eq!(json["categoria"], "Dev");
        assert_eq!(json["parceiro"], "github.com");
        assert_eq!(json["email"], "dev@example.com");
        assert_eq!(json["senha"], "c1ph3r");
        assert_eq!(json["descricao"], "work account");
    }

    #[test]
    fn test_unset_optionals_are_omitted_not_empty() {
        let record = AccessRecord::new("GitHub", "Dev", "ignored");
        let json = serde_json::to_value(to_wire(&record, "c1ph3r")).unwrap();

        let object = json.as_object().unwrap();
        for absent in ["parceiro", "email", "descricao", "accessToken"] {
            assert!(
                !object.contains_key(absent),
                "unset optional field '{}' must be omitted",
                absent
            );
        }
    }

    #[test]
    fn test_sealed_password_replaces_record_password() {
        let record = AccessRecord::new("GitHub", "Dev", "plaintext");
        let wire = to_wire(&record, "sealed-value");
        assert_eq!(wire.senha, "sealed-value");
    }

    #[test]
    fn test_decode_tolerates_missing_optionals() {
        let wire: WireRecord =
            serde_json::from_str(r#"{"nome":"GitHub","categoria":"Dev","senha":"c1ph3r"}"#)
                .unwrap();
        let record = from_wire(wire);

        assert_eq!(record.name, "GitHub");
        assert_eq!(record.category, "Dev");
        assert_eq!(record.password(), "c1ph3r");
        assert!(record.partner_domain.is_none());
        assert!(record.email.is_none());
        assert!(record.notes.is_none());
        assert!(record.freshness_token.is_none());
    }

    #[test]
    fn test_decode_passes_ciphertext_through_unchanged() {
        let wire: WireRecord = serde_json::from_str(
            r#"{"nome":"GitHub","categoria":"Dev","senha":"AAAAbbbbCCCC==","accessToken":"t-1"}"#,
        )
        .unwrap();
        let record = from_wire(wire);

        assert_eq!(record.password(), "AAAAbbbbCCCC==");
        assert_eq!(record.freshness_token.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_present_but_empty_optional_survives_decode() {
        let wire: WireRecord = serde_json::from_str(
            r#"{"nome":"GitHub","categoria":"Dev","senha":"x","email":""}"#,
        )
        .unwrap();
        assert_eq!(from_wire(wire).email.as_deref(), Some(""));
    }

    #[test]
    fn test_patch_always_carries_the_freshness_token() {
        let record = AccessRecord::new("GitHub", "Work", "ignored");
        let json = serde_json::to_value(to_patch(&record, "sealed", "token-2")).unwrap();

        assert_eq!(json["accessToken"], "token-2");
        assert_eq!(json["categoria"], "Work");
        assert_eq!(json["senha"], "sealed");
    }

    #[test]
    fn test_patch_writes_all_mutable_fields_with_explicit_nulls() {
        // An update must cover all six mutable fields. Unset optionals go
        // out as null so the store clears them instead of keeping stale
        // values from the previous document.
        let record = AccessRecord::new("GitHub", "Work", "ignored");
        let json = serde_json::to_value(to_patch(&record, "sealed", "token-3")).unwrap();

        let object = json.as_object().unwrap();
        for field in ["nome", "categoria", "parceiro", "email", "senha", "descricao"] {
            assert!(
                object.contains_key(field),
                "update patch must carry mutable field '{}'",
                field
            );
        }
        assert!(json["parceiro"].is_null());
        assert!(json["email"].is_null());
        assert!(json["descricao"].is_null());
    }

    #[test]
    fn test_create_document_never_carries_a_stale_token() {
        let mut record = AccessRecord::new("GitHub", "Dev", "ignored");
        record.freshness_token = Some("token-from-earlier-read".to_string());

        let json = serde_json::to_value(to_wire(&record, "sealed")).unwrap();
        assert!(
            !json.as_object().unwrap().contains_key("accessToken"),
            "creation must leave the freshness token unset"
        );
    }
}
