//! ALFA PassVault - Cryptographic Core
//!
//! PBKDF2-HMAC-SHA256 key stretching and AES-256-GCM field encryption.

pub mod keys;
pub mod aead;
pub mod verifier;

pub use keys::*;
pub use aead::*;
pub use verifier::SecretVerifier;
