//! ALFA PassVault - Vault Session
//!
//! Owns the master secret between a successful unlock and the next lock.
//! Verification decrypts one existing record; nothing else about the
//! secret is ever stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::config::VaultConfig;
use crate::crypto::{CipherEngine, SecretVerifier};
use crate::error::{VaultError, VaultResult};
use crate::record::CipherRecord;
use crate::secret::MasterSecret;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultState {
    Locked,
    Unlocked,
}

/// Snapshot of the session for callers and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: VaultState,
    pub unlocked_at: Option<DateTime<Utc>>,
}

struct Held {
    secret: Arc<MasterSecret>,
    unlocked_at: DateTime<Utc>,
}

/// Vault session - the only owner of the master secret
pub struct VaultSession {
    engine: CipherEngine,
    /// `Some` exactly while unlocked
    held: RwLock<Option<Held>>,
    /// Held for the whole of an unlock, and by `lock`, so transitions never interleave
    transition: Mutex<()>,
}

impl Default for VaultSession {
    fn default() -> Self {
        Self::with_engine(CipherEngine::default())
    }
}

impl VaultSession {
    pub fn new(config: &VaultConfig) -> VaultResult<Self> {
        Ok(Self::with_engine(CipherEngine::new(config)?))
    }

    pub fn with_engine(engine: CipherEngine) -> Self {
        Self {
            engine,
            held: RwLock::new(None),
            transition: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &CipherEngine {
        &self.engine
    }

    // ═══════════════════════════════════════════════════════════════════════
    // UNLOCK / LOCK
    // ═══════════════════════════════════════════════════════════════════════

    /// Unlock with a candidate secret.
    ///
    /// With no `sample` (the vault holds no records yet) there is nothing
    /// to check against: any non-empty secret is accepted and becomes the
    /// secret for every record created afterwards.
    ///
    /// With a `sample`, the candidate must decrypt it. On failure the
    /// session ends up `Locked`, the candidate is dropped and
    /// `IncorrectSecret` is returned.
    ///
    /// Fails with `Busy` while another `unlock` or a `lock` holds the
    /// transition guard.
    pub fn unlock(&self, candidate: MasterSecret, sample: Option<&CipherRecord>) -> VaultResult<()> {
        let _transition = self.transition.try_lock().ok_or(VaultError::Busy)?;

        if candidate.is_empty() {
            return Err(VaultError::Validation("master secret must not be empty".into()));
        }

        match sample {
            Some(record) => match self.engine.decrypt(record, &candidate) {
                Ok(mut plaintext) => plaintext.zeroize(),
                Err(VaultError::Crypto(e)) => {
                    drop(candidate);
                    self.discard();
                    log::warn!("unlock rejected: sample record did not decrypt");
                    return Err(VaultError::IncorrectSecret(e));
                }
                Err(e) => return Err(e),
            },
            None => {
                log::warn!("unlocking empty vault: no record to verify the secret against");
            }
        }

        self.hold(candidate);
        Ok(())
    }

    /// Unlock against a stored [`SecretVerifier`] instead of a record
    pub fn unlock_with_verifier(&self, candidate: MasterSecret, verifier: &SecretVerifier) -> VaultResult<()> {
        let _transition = self.transition.try_lock().ok_or(VaultError::Busy)?;

        match verifier.verify(&candidate, &self.engine) {
            Ok(()) => {
                self.hold(candidate);
                Ok(())
            }
            Err(VaultError::Crypto(e)) => {
                drop(candidate);
                self.discard();
                log::warn!("unlock rejected: verifier mismatch");
                Err(VaultError::IncorrectSecret(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Lock the vault and discard the secret. Idempotent.
    ///
    /// Calls already running with a secret from [`secret`](Self::secret)
    /// finish with it; the memory is zeroized once the last one drops it.
    pub fn lock(&self) {
        let _transition = self.transition.lock();
        if self.discard() {
            log::info!("vault locked");
        }
    }

    /// Check if a secret is available for encrypt/decrypt
    pub fn is_unlocked(&self) -> bool {
        self.held.read().is_some()
    }

    pub fn state(&self) -> VaultState {
        if self.is_unlocked() {
            VaultState::Unlocked
        } else {
            VaultState::Locked
        }
    }

    pub fn status(&self) -> SessionStatus {
        let held = self.held.read();
        SessionStatus {
            state: if held.is_some() {
                VaultState::Unlocked
            } else {
                VaultState::Locked
            },
            unlocked_at: held.as_ref().map(|h| h.unlocked_at),
        }
    }

    /// Current secret for one encrypt/decrypt call, `None` while locked
    pub fn secret(&self) -> Option<Arc<MasterSecret>> {
        self.held.read().as_ref().map(|h| Arc::clone(&h.secret))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // RECORD OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Encrypt a field with the session secret
    pub fn encrypt(&self, plaintext: &[u8]) -> VaultResult<CipherRecord> {
        let secret = self.secret().ok_or(VaultError::VaultLocked)?;
        self.engine.encrypt(plaintext, &secret)
    }

    /// Decrypt a field with the session secret
    pub fn decrypt(&self, record: &CipherRecord) -> VaultResult<Vec<u8>> {
        let secret = self.secret().ok_or(VaultError::VaultLocked)?;
        self.engine.decrypt(record, &secret)
    }

    /// Create a verifier for the current secret
    pub fn create_verifier(&self) -> VaultResult<SecretVerifier> {
        let secret = self.secret().ok_or(VaultError::VaultLocked)?;
        SecretVerifier::create(&secret, &self.engine)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    fn hold(&self, secret: MasterSecret) {
        let previous = self.held.write().replace(Held {
            secret: Arc::new(secret),
            unlocked_at: Utc::now(),
        });
        drop(previous);
        log::info!("vault unlocked");
    }

    /// Drop the held secret; true if there was one
    fn discard(&self) -> bool {
        self.held.write().take().is_some()
    }
}
