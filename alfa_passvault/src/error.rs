//! ALFA PassVault - Error Types
//!
//! None of these variants ever carry the master secret, derived key
//! material or decrypted plaintext.

use thiserror::Error;

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Authenticated decryption failed.
///
/// Wrong secret and tampered ciphertext end up here alike, with the same
/// message, so callers cannot tell the two apart.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("authenticated decryption failed")]
pub struct CryptoError;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    // ═══════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    // ═══════════════════════════════════════════════════════════════
    // CRYPTO ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Encryption failed")]
    EncryptionFailed,

    // ═══════════════════════════════════════════════════════════════
    // SESSION ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Incorrect master secret")]
    IncorrectSecret(#[source] CryptoError),

    #[error("Another lock or unlock is in progress")]
    Busy,

    #[error("Vault is locked")]
    VaultLocked,

    // ═══════════════════════════════════════════════════════════════
    // FILE ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl VaultError {
    /// Check if this is a security-critical error
    pub fn is_security_critical(&self) -> bool {
        matches!(
            self,
            VaultError::Crypto(_) | VaultError::IncorrectSecret(_)
        )
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_incorrect_secret_wraps_crypto_error() {
        let err = VaultError::IncorrectSecret(CryptoError);
        let source = err.source().expect("source is kept");
        assert_eq!(source.to_string(), CryptoError.to_string());
        assert!(err.is_security_critical());
    }

    #[test]
    fn test_crypto_message_is_fixed() {
        let err: VaultError = CryptoError.into();
        assert_eq!(err.to_string(), "authenticated decryption failed");
        assert!(err.is_security_critical());
    }
}
