// Cofre — Cipher Boundary
//
// Seals (encrypts) and opens (decrypts) the password field. Sealed form:
// base64(nonce || AES-256-GCM ciphertext+tag), one fresh random nonce per
// seal. The GCM tag makes any tampering fail on open rather than decrypt
// to wrong plaintext.
//
// Flow:
//   1. `CipherBoundary::new(provider)` — fetch the master secret and derive
//      the sealing key with Argon2id
//   2. `seal()` / `open()` — pure in-memory transforms, safe to call from
//      any number of in-flight vault operations

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::keys::KeyMaterialProvider;
use super::CipherError;

/// AES-GCM nonce length in bytes (96-bit).
const NONCE_LEN: usize = 12;

/// Length of the derived sealing key in bytes (256-bit for AES-256).
const SEALING_KEY_LEN: usize = 32;

/// Domain-separation label mixed into the Argon2id salt, so the sealing
/// key can never collide with a key derived for another purpose.
const SALT_LABEL: &str = "cofre::sealing-key";

// Argon2id parameters: m=65536 (64 MiB), t=3, p=4. Paid once per process,
// at boundary construction.
const ARGON2_M_COST: u32 = 65536;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Encrypts and decrypts the password field of access records.
///
/// Holds the derived sealing key for the lifetime of the process. `seal`
/// and `open` take `&self`, so a single boundary behind an `Arc` serves
/// concurrent vault operations.
pub struct CipherBoundary {
    cipher: Aes256Gcm,
}

impl CipherBoundary {
    /// Build the boundary from the platform key material provider.
    /// Fails with a keyring/derivation error when the secure store backing
    /// the master secret is inaccessible.
    pub fn new<P: KeyMaterialProvider>(provider: &P) -> Result<Self, CipherError> {
        let master = provider.get_or_create_master_secret()?;
        Self::from_master_secret(&master)
    }

    /// Build the boundary directly from a master secret. Used by tests and
    /// embedders that manage key material themselves.
    pub fn from_master_secret(master_secret: &[u8]) -> Result<Self, CipherError> {
        let key = derive_sealing_key(master_secret)?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CipherError::Derivation(format!("sealing key rejected: {}", e)))?;
        Ok(Self { cipher })
    }

    /// Encrypt a plaintext password into its sealed wire/storage form.
    pub fn seal(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encryption("AES-GCM encryption failed".to_string()))?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(envelope))
    }

    /// Decrypt a previously sealed password back to plaintext.
    ///
    /// Fails with a decryption-kind error when the input is malformed,
    /// truncated, tampered with, or was sealed under different key
    /// material. Never succeeds with wrong plaintext.
    pub fn open(&self, sealed: &str) -> Result<Zeroizing<String>, CipherError> {
        let envelope = BASE64
            .decode(sealed)
            .map_err(|_| CipherError::Decryption("sealed value is not valid base64".to_string()))?;

        if envelope.len() <= NONCE_LEN {
            return Err(CipherError::Decryption(
                "sealed value is truncated".to_string(),
            ));
        }

        let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = Zeroizing::new(self.cipher.decrypt(nonce, ciphertext).map_err(|_| {
            CipherError::Decryption("ciphertext rejected (tampered or wrong key)".to_string())
        })?);

        String::from_utf8(plaintext.to_vec())
            .map(Zeroizing::new)
            .map_err(|_| CipherError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}

/// Derive the AES-256 sealing key from the master secret using Argon2id
/// with a deterministic salt: SHA-256(SALT_LABEL).
fn derive_sealing_key(master_secret: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let salt = Sha256::digest(SALT_LABEL.as_bytes());

    let params = Params::new(
        ARGON2_M_COST,
        ARGON2_T_COST,
        ARGON2_P_COST,
        Some(SEALING_KEY_LEN),
    )
    .map_err(|e| CipherError::Derivation(format!("invalid Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; SEALING_KEY_LEN]);
    argon2
        .hash_password_into(master_secret, &salt, &mut key)
        .map_err(|e| CipherError::Derivation(format!("Argon2id hash failed: {}", e)))?;

    Ok(key)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::keys::mock::MockKeyProvider;
    use super::super::keys::MASTER_SECRET_LEN;
    use super::*;

    fn boundary() -> CipherBoundary {
        CipherBoundary::from_master_secret(&[7u8; MASTER_SECRET_LEN]).unwrap()
    }

    #[test]
    fn test_seal_open_round_trip() {
        let cipher = boundary();
        for plaintext in ["p@ss", "", "senha com espaços e açúcar", "0"] {
            let sealed = cipher.seal(plaintext).unwrap();
            let opened = cipher.open(&sealed).unwrap();
            assert_eq!(opened.as_str(), plaintext);
        }
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext() {
        let cipher = boundary();
        let sealed = cipher.seal("hunter2").unwrap();
        assert_ne!(sealed, "hunter2", "Sealed form must never equal plaintext");
    }

    #[test]
    fn test_seal_is_randomized_per_call() {
        let cipher = boundary();
        let a = cipher.seal("same input").unwrap();
        let b = cipher.seal("same input").unwrap();
        assert_ne!(a, b, "Fresh nonce per seal must yield distinct envelopes");
    }

    #[test]
    fn test_tampered_ciphertext_fails_to_open() {
        let cipher = boundary();
        let sealed = cipher.seal("p@ss").unwrap();

        let mut bytes = BASE64.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);

        let result = cipher.open(&tampered);
        assert!(
            matches!(result, Err(CipherError::Decryption(_))),
            "Tampered input must fail decryption, not succeed with wrong plaintext"
        );
    }

    #[test]
    fn test_truncated_input_fails_to_open() {
        let cipher = boundary();
        let err = cipher.open(&BASE64.encode([1u8; NONCE_LEN])).unwrap_err();
        assert!(matches!(err, CipherError::Decryption(_)));
    }

    #[test]
    fn test_garbage_input_fails_to_open() {
        let cipher = boundary();
        let err = cipher.open("not base64 at all !!!").unwrap_err();
        assert!(matches!(err, CipherError::Decryption(_)));
    }

    #[test]
    fn test_rotated_key_material_fails_to_open() {
        let old = CipherBoundary::from_master_secret(&[1u8; MASTER_SECRET_LEN]).unwrap();
        let new = CipherBoundary::from_master_secret(&[2u8; MASTER_SECRET_LEN]).unwrap();

        let sealed = old.seal("p@ss").unwrap();
        let err = new.open(&sealed).unwrap_err();
        assert!(matches!(err, CipherError::Decryption(_)));
    }

    #[test]
    fn test_same_master_secret_yields_interoperable_boundaries() {
        // Key derivation must be deterministic: a value sealed before a
        // process restart stays readable afterwards.
        let first = CipherBoundary::from_master_secret(&[9u8; MASTER_SECRET_LEN]).unwrap();
        let second = CipherBoundary::from_master_secret(&[9u8; MASTER_SECRET_LEN]).unwrap();

        let sealed = first.seal("persisted").unwrap();
        assert_eq!(second.open(&sealed).unwrap().as_str(), "persisted");
    }

    #[test]
    fn test_boundary_from_provider() {
        let provider = MockKeyProvider::with_secret(vec![42u8; MASTER_SECRET_LEN]);
        let cipher = CipherBoundary::new(&provider).unwrap();

        let sealed = cipher.seal("via provider").unwrap();
        assert_eq!(cipher.open(&sealed).unwrap().as_str(), "via provider");
    }
}
