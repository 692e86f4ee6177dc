// Cofre — Library root
//
// Re-exports the cipher, identity, vault, and CLI modules.

pub mod cipher;
pub mod cli;
pub mod error;
pub mod identity;
pub mod vault;

pub use error::{CofreError, Result};
