//! ALFA PassVault - Configuration

use std::env::VarError;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::{DEFAULT_PBKDF2_ITERATIONS, MIN_PBKDF2_ITERATIONS};
use crate::error::{VaultError, VaultResult};

/// Environment override for the PBKDF2 round count
pub const ITERATIONS_ENV: &str = "ALFA_PASSVAULT_PBKDF2_ITERATIONS";

/// Vault configuration
///
/// Records carry no KDF parameters, so every party reading a record must
/// use the same iteration count as the party that wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 rounds
    #[serde(default = "default_iterations")]
    pub pbkdf2_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl VaultConfig {
    pub fn validate(&self) -> VaultResult<()> {
        if self.pbkdf2_iterations < MIN_PBKDF2_ITERATIONS {
            return Err(VaultError::Validation(format!(
                "pbkdf2_iterations must be at least {}, got {}",
                MIN_PBKDF2_ITERATIONS, self.pbkdf2_iterations
            )));
        }
        Ok(())
    }

    /// Defaults, overridden by `ALFA_PASSVAULT_PBKDF2_ITERATIONS` when set
    pub fn from_env() -> VaultResult<Self> {
        Self::from_env_value(std::env::var(ITERATIONS_ENV))
    }

    fn from_env_value(value: Result<String, VarError>) -> VaultResult<Self> {
        let mut config = Self::default();
        match value {
            Ok(raw) => {
                config.pbkdf2_iterations = raw.trim().parse().map_err(|_| {
                    VaultError::Validation(format!("{} is not a number: {:?}", ITERATIONS_ENV, raw))
                })?;
            }
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(_)) => {
                return Err(VaultError::Validation(format!("{} is not valid unicode", ITERATIONS_ENV)));
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> VaultResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: VaultConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> VaultResult<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn default_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}
