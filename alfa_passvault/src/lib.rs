//! # ALFA PassVault
//!
//! Client-side crypto core of the ALFA password vault.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      ALFA PASSVAULT                      │
//! │  ┌──────────────────────────────────────────────────┐    │
//! │  │ VAULT SESSION   Locked ⇄ Unlocked, owns secret   │    │
//! │  └───────────────┬──────────────────────────────────┘    │
//! │                  │ unlock: decrypt one sample record     │
//! │  ┌───────────────┴──────────┐  ┌──────────────────────┐  │
//! │  │ CIPHER ENGINE            │  │ PASSWORD GENERATOR   │  │
//! │  │ AES-256-GCM, fresh IV    │  │ OsRng, uniform draw  │  │
//! │  └───────────────┬──────────┘  └──────────────────────┘  │
//! │  ┌───────────────┴──────────┐  ┌──────────────────────┐  │
//! │  │ KEY DERIVATION           │  │ STRENGTH SCORER      │  │
//! │  │ PBKDF2-SHA256, fresh salt│  │ length + classes     │  │
//! │  └──────────────────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//!
//! - Every field encrypted with its own salt, IV and derived key
//! - Wrong secret and tampered data fail identically
//! - Master secret lives in RAM only, zeroized on lock (best-effort)
//! - An empty vault accepts any secret on unlock: there is nothing to
//!   verify against. Use [`SecretVerifier`] to close that gap.

pub mod config;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod record;
pub mod secret;
pub mod session;
pub mod strength;

pub use config::VaultConfig;
pub use crypto::{decrypt, derive_key, encrypt, CipherEngine, KeyMaterial, SecretVerifier};
pub use error::{CryptoError, VaultError, VaultResult};
pub use generator::{generate, CharClass, PasswordPolicy};
pub use record::{CipherRecord, PackedRecord};
pub use secret::MasterSecret;
pub use session::{SessionStatus, VaultSession, VaultState};
pub use strength::{score, StrengthLabel, StrengthReport};

/// ALFA PassVault version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
