//! ALFA PassVault - Master Secret
//!
//! The master secret lives only in RAM. It is never serialized, never
//! cloned, and its backing buffer is zeroized on drop.
//!
//! Zeroization is best-effort: the allocator, the OS or the caller may
//! still hold earlier copies (swap, the original input buffer). Construct
//! the secret from an owned `String`/`Vec<u8>` so no extra copy is made.

use std::fmt;

use secrecy::{ExposeSecret, Secret};

/// User-held master secret
pub struct MasterSecret {
    inner: Secret<Vec<u8>>,
}

impl MasterSecret {
    /// Take ownership of raw secret bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            inner: Secret::new(bytes),
        }
    }

    /// Take ownership of a typed password without copying it
    pub fn from_password(password: String) -> Self {
        Self::new(password.into_bytes())
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }

    /// Raw bytes, for key derivation only
    pub(crate) fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }
}

impl From<String> for MasterSecret {
    fn from(password: String) -> Self {
        Self::from_password(password)
    }
}

impl From<&str> for MasterSecret {
    fn from(password: &str) -> Self {
        Self::new(password.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for MasterSecret {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}
