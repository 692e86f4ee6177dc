// Cofre — Cipher Module
//
// Seals and opens the password field of an access record. The master
// secret lives in the OS keyring (Keychain/DPAPI/libsecret); the sealing
// key is derived from it with Argon2id and never leaves this module.

mod boundary;
mod error;
mod keys;

pub use boundary::CipherBoundary;
pub use error::CipherError;
pub use keys::{KeyMaterialProvider, KeyringProvider};
