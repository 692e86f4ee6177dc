// Cofre — Vault error types

use thiserror::Error;

use crate::cipher::CipherError;
use crate::identity::IdentityError;

use super::models::RecordId;
use super::remote::RemoteError;

/// Everything a vault operation can fail with. Each variant is scoped to
/// the single operation that produced it; the manager stays usable after
/// any of them.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Validation failed — missing required field(s): {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("No authenticated principal — sign in before accessing the vault")]
    NotAuthenticated,

    #[error("Could not seal password: {0}")]
    Encryption(#[source] CipherError),

    #[error("Could not open sealed password: {0}")]
    Decryption(#[source] CipherError),

    #[error("Access record not found: {0}")]
    NotFound(RecordId),

    #[error("Remote read failed: {0}")]
    RemoteRead(#[source] RemoteError),

    #[error("Remote write failed: {0}")]
    RemoteWrite(#[source] RemoteError),

    #[error("Record changed since it was last read — reload and retry")]
    Conflict,
}

impl From<IdentityError> for VaultError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NotAuthenticated => VaultError::NotAuthenticated,
        }
    }
}
