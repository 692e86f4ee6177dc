// Cofre — Top-level error types
//
// Aggregates errors from the cipher, identity, and vault modules into a
// single error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Cofre operations.
#[derive(Debug, Error)]
pub enum CofreError {
    #[error("Cipher error: {0}")]
    Cipher(#[from] crate::cipher::CipherError),

    #[error("Identity error: {0}")]
    Identity(#[from] crate::identity::IdentityError),

    #[error("Vault error: {0}")]
    Vault(#[from] crate::vault::VaultError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CofreError>;
