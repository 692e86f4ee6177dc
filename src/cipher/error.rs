// Cofre — Cipher error types

use thiserror::Error;

/// Failures at the cipher boundary. Callers must be able to tell "cannot
/// write a new secret" (`Keyring`/`Derivation`/`Encryption`) apart from
/// "cannot read this secret" (`Decryption`).
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("Key derivation error: {0}")]
    Derivation(String),

    #[error("Encryption failure: {0}")]
    Encryption(String),

    #[error("Decryption failure: {0}")]
    Decryption(String),
}
