//! ALFA PassVault - Secret Verifier
//!
//! Optional stand-alone check value so an empty vault can still reject a
//! mistyped secret. Stores a salt and HMAC-SHA256 of a fixed label under
//! the derived key. It offers an attacker exactly what any stored record
//! already offers (an offline guess check at full PBKDF2 cost), nothing
//! more.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::aead::CipherEngine;
use super::keys::{generate_salt, KeyMaterial, SALT_LEN};
use crate::error::{CryptoError, VaultError, VaultResult};
use crate::secret::MasterSecret;

type HmacSha256 = Hmac<Sha256>;

/// Label authenticated by every verifier
const VERIFIER_LABEL: &[u8] = b"ALFA:PASSVAULT:VERIFIER:v1";

/// Tag length for HMAC-SHA256
pub const VERIFIER_TAG_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedVerifier", into = "EncodedVerifier")]
pub struct SecretVerifier {
    salt: [u8; SALT_LEN],
    tag: [u8; VERIFIER_TAG_LEN],
}

impl SecretVerifier {
    /// Build a verifier for `secret` under a fresh salt
    pub fn create(secret: &MasterSecret, engine: &CipherEngine) -> VaultResult<Self> {
        let salt = generate_salt();
        let key = engine.derive_key(secret, &salt)?;
        let tag: [u8; VERIFIER_TAG_LEN] = new_mac(&key).finalize().into_bytes().into();
        Ok(Self { salt, tag })
    }

    /// Check a candidate secret in constant time
    pub fn verify(&self, candidate: &MasterSecret, engine: &CipherEngine) -> VaultResult<()> {
        let key = engine.derive_key(candidate, &self.salt)?;
        new_mac(&key)
            .verify_slice(&self.tag)
            .map_err(|_| VaultError::Crypto(CryptoError))
    }
}

fn new_mac(key: &KeyMaterial) -> HmacSha256 {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.expose())
        .expect("HMAC accepts keys of any length");
    mac.update(VERIFIER_LABEL);
    mac
}

/// Wire form with base64 fields
#[derive(Serialize, Deserialize)]
struct EncodedVerifier {
    salt: String,
    tag: String,
}

impl From<SecretVerifier> for EncodedVerifier {
    fn from(v: SecretVerifier) -> Self {
        Self {
            salt: STANDARD.encode(v.salt),
            tag: STANDARD.encode(v.tag),
        }
    }
}

impl TryFrom<EncodedVerifier> for SecretVerifier {
    type Error = VaultError;

    fn try_from(e: EncodedVerifier) -> VaultResult<Self> {
        let salt: [u8; SALT_LEN] = STANDARD
            .decode(&e.salt)?
            .try_into()
            .map_err(|_| VaultError::InvalidRecord("verifier salt must be 16 bytes".into()))?;
        let tag: [u8; VERIFIER_TAG_LEN] = STANDARD
            .decode(&e.tag)?
            .try_into()
            .map_err(|_| VaultError::InvalidRecord("verifier tag must be 32 bytes".into()))?;
        Ok(Self { salt, tag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_same_secret() {
        let engine = CipherEngine::default();
        let verifier = SecretVerifier::create(&MasterSecret::from("Tr0ub4dor&3"), &engine).unwrap();
        assert!(verifier.verify(&MasterSecret::from("Tr0ub4dor&3"), &engine).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let engine = CipherEngine::default();
        let verifier = SecretVerifier::create(&MasterSecret::from("Tr0ub4dor&3"), &engine).unwrap();
        let result = verifier.verify(&MasterSecret::from("wrong-password"), &engine);
        assert!(matches!(result, Err(VaultError::Crypto(_))));
    }

    #[test]
    fn test_tampered_tag_rejected() {
        let engine = CipherEngine::default();
        let secret = MasterSecret::from("pw");
        let mut verifier = SecretVerifier::create(&secret, &engine).unwrap();
        verifier.tag[0] ^= 1;
        assert!(verifier.verify(&secret, &engine).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let engine = CipherEngine::default();
        let secret = MasterSecret::from("pw");
        let verifier = SecretVerifier::create(&secret, &engine).unwrap();

        let json = serde_json::to_string(&verifier).unwrap();
        let parsed: SecretVerifier = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, verifier);
        assert!(parsed.verify(&secret, &engine).is_ok());
    }

    #[test]
    fn test_short_tag_rejected_on_parse() {
        let json = format!(
            r#"{{"salt":"{}","tag":"{}"}}"#,
            STANDARD.encode([0u8; SALT_LEN]),
            STANDARD.encode([0u8; 8])
        );
        assert!(serde_json::from_str::<SecretVerifier>(&json).is_err());
    }
}
