//! ALFA PassVault - Cipher Records
//!
//! The only form in which a secret field leaves this crate.
//!
//! Default wire form is split: three base64 strings `ciphertext`, `iv`,
//! `salt`. Older stores keep IV and salt packed in one field as
//! `iv_base64 ":" salt_base64`; [`PackedRecord`] converts to and from it.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::crypto::{IV_LEN, SALT_LEN};
use crate::error::{VaultError, VaultResult};

/// Separator between IV and salt in the packed form
pub const PACKED_SEPARATOR: char = ':';

/// One encrypted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedRecord", into = "EncodedRecord")]
pub struct CipherRecord {
    /// AES-GCM output, tag included
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LEN],
    pub salt: [u8; SALT_LEN],
}

impl CipherRecord {
    /// `iv_base64:salt_base64`
    pub fn packed_params(&self) -> String {
        format!(
            "{}{}{}",
            STANDARD.encode(self.iv),
            PACKED_SEPARATOR,
            STANDARD.encode(self.salt)
        )
    }

    pub fn to_packed(&self) -> PackedRecord {
        PackedRecord {
            ciphertext: STANDARD.encode(&self.ciphertext),
            iv: self.packed_params(),
        }
    }

    /// Serialize to JSON (split form)
    pub fn to_json(&self) -> VaultResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON in either split or packed form
    pub fn from_json(json: &str) -> VaultResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("salt").is_some() {
            Ok(serde_json::from_value(value)?)
        } else {
            let packed: PackedRecord = serde_json::from_value(value)?;
            packed.try_into()
        }
    }

    /// Save record to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> VaultResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load record from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> VaultResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Legacy two-field record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedRecord {
    pub ciphertext: String,
    /// `iv_base64:salt_base64`
    pub iv: String,
}

impl TryFrom<PackedRecord> for CipherRecord {
    type Error = VaultError;

    fn try_from(packed: PackedRecord) -> VaultResult<Self> {
        let (iv, salt) = packed
            .iv
            .split_once(PACKED_SEPARATOR)
            .ok_or_else(|| VaultError::InvalidRecord("packed iv field has no ':' separator".into()))?;

        EncodedRecord {
            ciphertext: packed.ciphertext,
            iv: iv.to_string(),
            salt: salt.to_string(),
        }
        .try_into()
    }
}

impl From<&CipherRecord> for PackedRecord {
    fn from(record: &CipherRecord) -> Self {
        record.to_packed()
    }
}

/// Split wire form
#[derive(Serialize, Deserialize)]
struct EncodedRecord {
    ciphertext: String,
    iv: String,
    salt: String,
}

impl From<CipherRecord> for EncodedRecord {
    fn from(record: CipherRecord) -> Self {
        Self {
            ciphertext: STANDARD.encode(&record.ciphertext),
            iv: STANDARD.encode(record.iv),
            salt: STANDARD.encode(record.salt),
        }
    }
}

impl TryFrom<EncodedRecord> for CipherRecord {
    type Error = VaultError;

    fn try_from(encoded: EncodedRecord) -> VaultResult<Self> {
        let ciphertext = STANDARD.decode(&encoded.ciphertext)?;
        let iv: [u8; IV_LEN] = STANDARD.decode(&encoded.iv)?.try_into().map_err(|v: Vec<u8>| {
            VaultError::InvalidRecord(format!("iv must be {} bytes, got {}", IV_LEN, v.len()))
        })?;
        let salt: [u8; SALT_LEN] = STANDARD.decode(&encoded.salt)?.try_into().map_err(|v: Vec<u8>| {
            VaultError::InvalidRecord(format!("salt must be {} bytes, got {}", SALT_LEN, v.len()))
        })?;

        Ok(Self {
            ciphertext,
            iv,
            salt,
        })
    }
}
