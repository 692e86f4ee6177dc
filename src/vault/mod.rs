// Cofre — Vault Module
//
// The credential vault synchronization core: record model and wire codec,
// the remote document store seam, and the manager that orchestrates
// create/read/update/delete with sealing applied at the boundary.

mod categories;
mod codec;
mod error;
mod manager;
mod models;
mod remote;
mod token;

pub use categories::distinct_categories;
pub use codec::{WirePatch, WireRecord};
pub use error::VaultError;
pub use manager::{CreatedRecord, VaultManager};
pub use models::{AccessRecord, IdentifiedRecord, RecordId};
pub use remote::{HttpRemoteStore, MemoryRemoteStore, RemoteError, RemoteStore};
pub use token::FreshnessTokenIssuer;
