//! ALFA PassVault - Key Derivation
//!
//! Stretches the master secret into per-record AES keys with
//! PBKDF2-HMAC-SHA256, one fresh salt per record.

use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{VaultError, VaultResult};
use crate::secret::MasterSecret;

/// Key length for AES-256
pub const KEY_LEN: usize = 32;

/// Salt length stored with every record
pub const SALT_LEN: usize = 16;

/// Nonce length for AES-GCM
pub const IV_LEN: usize = 12;

/// Lowest accepted PBKDF2 round count
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Round count used when nothing else is configured
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived per-record key.
///
/// Deliberately neither `Clone` nor `Debug`; the bytes never leave the crate.
pub struct KeyMaterial {
    inner: Secret<[u8; KEY_LEN]>,
}

impl KeyMaterial {
    fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            inner: Secret::new(bytes),
        }
    }

    pub(crate) fn expose(&self) -> &[u8; KEY_LEN] {
        self.inner.expose_secret()
    }
}

/// Derive a 256-bit key from the master secret and a salt
///
/// Deterministic in `(secret, salt, iterations)`. A wrong secret derives
/// a perfectly valid key; it only shows up later as a tag mismatch.
pub fn derive_key(
    secret: &MasterSecret,
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> VaultResult<KeyMaterial> {
    if secret.is_empty() {
        return Err(VaultError::Validation("master secret must not be empty".into()));
    }
    if iterations < MIN_PBKDF2_ITERATIONS {
        return Err(VaultError::Validation(format!(
            "at least {} PBKDF2 iterations required",
            MIN_PBKDF2_ITERATIONS
        )));
    }

    let mut okm = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.expose(), salt, iterations, &mut okm);
    let key = KeyMaterial::new(okm);
    okm.zeroize();

    Ok(key)
}

/// Generate a random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Generate a random nonce for AES-GCM
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        let secret = MasterSecret::from("correct horse battery staple");
        let salt = [7u8; SALT_LEN];

        let k1 = derive_key(&secret, &salt, DEFAULT_PBKDF2_ITERATIONS).unwrap();
        let k2 = derive_key(&secret, &salt, DEFAULT_PBKDF2_ITERATIONS).unwrap();

        assert_eq!(k1.expose(), k2.expose());
    }

    #[test]
    fn test_salt_changes_key() {
        let secret = MasterSecret::from("correct horse battery staple");

        let k1 = derive_key(&secret, &[1u8; SALT_LEN], DEFAULT_PBKDF2_ITERATIONS).unwrap();
        let k2 = derive_key(&secret, &[2u8; SALT_LEN], DEFAULT_PBKDF2_ITERATIONS).unwrap();

        assert_ne!(k1.expose(), k2.expose());
    }

    #[test]
    fn test_matches_pbkdf2_reference() {
        let secret = MasterSecret::from("password");
        let salt = *b"saltsaltsaltsalt";
        let key = derive_key(&secret, &salt, MIN_PBKDF2_ITERATIONS).unwrap();

        let mut expected = [0u8; KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"password", &salt, MIN_PBKDF2_ITERATIONS, &mut expected);
        assert_eq!(key.expose(), &expected);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let secret = MasterSecret::new(Vec::new());
        let result = derive_key(&secret, &generate_salt(), DEFAULT_PBKDF2_ITERATIONS);
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_low_iterations_rejected() {
        let secret = MasterSecret::from("pw");
        let result = derive_key(&secret, &generate_salt(), 10_000);
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_validation_message_has_no_secret() {
        let secret = MasterSecret::from("hunter2");
        let err = derive_key(&secret, &generate_salt(), 1).err().unwrap();
        assert!(!err.to_string().contains("hunter2"));
    }
}
