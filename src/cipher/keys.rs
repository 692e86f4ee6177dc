// Cofre — Master Key Material
//
// Owns the lifecycle of the master secret backing the cipher boundary.
// On first use a random 256-bit secret is generated and stored in the
// platform keyring; it is never written to logs or disk by this crate.

use rand::RngCore;
use zeroize::Zeroizing;

use super::CipherError;

/// Service name identifying Cofre entries in the platform keyring.
const KEYRING_SERVICE: &str = "cofre-credential-vault";

/// Username for the keyring entry holding the master secret.
const KEYRING_USER: &str = "master-secret";

/// Length of the randomly generated master secret in bytes.
pub(crate) const MASTER_SECRET_LEN: usize = 32;

/// Abstraction over master secret storage, enabling platform-specific
/// backends and in-memory implementations for tests.
pub trait KeyMaterialProvider {
    /// Retrieve the master secret, generating and storing a new one on
    /// first use.
    fn get_or_create_master_secret(&self) -> Result<Zeroizing<Vec<u8>>, CipherError>;

    /// Check whether a master secret already exists.
    fn has_master_secret(&self) -> Result<bool, CipherError>;

    /// Delete the master secret.
    /// WARNING: every previously sealed password becomes unreadable.
    fn delete_master_secret(&self) -> Result<(), CipherError>;
}

/// Production implementation backed by the `keyring` crate.
/// Dispatches to:
///   - Linux: D-Bus Secret Service (GNOME Keyring / KDE Wallet)
///   - macOS: Security.framework Keychain
///   - Windows: Windows Credential Manager
pub struct KeyringProvider {
    service: String,
    user: String,
}

impl KeyringProvider {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CipherError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| CipherError::Keyring(format!("failed to create keyring entry: {}", e)))
    }
}

impl Default for KeyringProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMaterialProvider for KeyringProvider {
    fn get_or_create_master_secret(&self) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        let entry = self.entry()?;

        match entry.get_secret() {
            Ok(secret) => {
                tracing::debug!("Retrieved existing master secret from keyring");
                Ok(Zeroizing::new(secret))
            }
            Err(keyring::Error::NoEntry) => {
                tracing::info!("No master secret found — generating new one");
                let mut secret = Zeroizing::new(vec![0u8; MASTER_SECRET_LEN]);
                rand::rng().fill_bytes(&mut secret);
                entry.set_secret(&secret).map_err(|e| {
                    CipherError::Keyring(format!("failed to store master secret: {}", e))
                })?;
                tracing::info!("Master secret stored in platform keyring");
                Ok(secret)
            }
            Err(e) => Err(CipherError::Keyring(format!(
                "failed to retrieve master secret: {}",
                e
            ))),
        }
    }

    fn has_master_secret(&self) -> Result<bool, CipherError> {
        let entry = self.entry()?;
        match entry.get_secret() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(CipherError::Keyring(format!(
                "failed to check master secret: {}",
                e
            ))),
        }
    }

    fn delete_master_secret(&self) -> Result<(), CipherError> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) => {
                tracing::warn!("Master secret deleted — sealed passwords are now unreadable");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CipherError::Keyring(format!(
                "failed to delete master secret: {}",
                e
            ))),
        }
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::MockKeyProvider;
    use super::*;

    #[test]
    fn test_master_secret_has_expected_length() {
        let provider = MockKeyProvider::new();
        let secret = provider.get_or_create_master_secret().unwrap();
        assert_eq!(secret.len(), MASTER_SECRET_LEN);
    }

    #[test]
    fn test_master_secret_is_stable_once_created() {
        let provider = MockKeyProvider::new();
        let first = provider.get_or_create_master_secret().unwrap();
        let second = provider.get_or_create_master_secret().unwrap();
        assert_eq!(
            first.as_slice(),
            second.as_slice(),
            "Subsequent calls must return the same master secret"
        );
    }

    #[test]
    fn test_has_master_secret() {
        let provider = MockKeyProvider::new();
        assert!(!provider.has_master_secret().unwrap());

        provider.get_or_create_master_secret().unwrap();
        assert!(provider.has_master_secret().unwrap());
    }

    #[test]
    fn test_delete_master_secret() {
        let provider = MockKeyProvider::new();
        provider.get_or_create_master_secret().unwrap();

        provider.delete_master_secret().unwrap();
        assert!(!provider.has_master_secret().unwrap());
    }

    #[test]
    fn test_delete_nonexistent_secret_is_ok() {
        let provider = MockKeyProvider::new();
        assert!(provider.delete_master_secret().is_ok());
    }
}
