//! ALFA PassVault - AEAD Encryption
//!
//! AES-256-GCM over a single field, keyed per record through PBKDF2.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};

use super::keys::{derive_key, generate_iv, generate_salt, KeyMaterial, DEFAULT_PBKDF2_ITERATIONS, SALT_LEN};
use crate::config::VaultConfig;
use crate::error::{CryptoError, VaultError, VaultResult};
use crate::record::CipherRecord;
use crate::secret::MasterSecret;

/// Record-level cipher
///
/// Holds only the KDF round count; the secret is passed to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherEngine {
    iterations: u32,
}

impl Default for CipherEngine {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl CipherEngine {
    pub fn new(config: &VaultConfig) -> VaultResult<Self> {
        config.validate()?;
        Ok(Self {
            iterations: config.pbkdf2_iterations,
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive key material for one record
    pub fn derive_key(&self, secret: &MasterSecret, salt: &[u8; SALT_LEN]) -> VaultResult<KeyMaterial> {
        derive_key(secret, salt, self.iterations)
    }

    /// Encrypt one field under a fresh salt and IV
    pub fn encrypt(&self, plaintext: &[u8], secret: &MasterSecret) -> VaultResult<CipherRecord> {
        let salt = generate_salt();
        let iv = generate_iv();
        let key = self.derive_key(secret, &salt)?;

        let ciphertext = new_cipher(&key)
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|_| VaultError::EncryptionFailed)?;

        Ok(CipherRecord {
            ciphertext,
            iv,
            salt,
        })
    }

    /// Decrypt one field
    ///
    /// Any failure of the tag check maps to the same `CryptoError`.
    pub fn decrypt(&self, record: &CipherRecord, secret: &MasterSecret) -> VaultResult<Vec<u8>> {
        let key = self.derive_key(secret, &record.salt)?;

        new_cipher(&key)
            .decrypt(Nonce::from_slice(&record.iv), record.ciphertext.as_slice())
            .map_err(|_| VaultError::Crypto(CryptoError))
    }
}

fn new_cipher(key: &KeyMaterial) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.expose()))
}

/// Encrypt with the default engine
pub fn encrypt(plaintext: &[u8], secret: &MasterSecret) -> VaultResult<CipherRecord> {
    CipherEngine::default().encrypt(plaintext, secret)
}

/// Decrypt with the default engine
pub fn decrypt(record: &CipherRecord, secret: &MasterSecret) -> VaultResult<Vec<u8>> {
    CipherEngine::default().decrypt(record, secret)
}
