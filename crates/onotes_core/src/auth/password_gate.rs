//! Passphrase hashing and verification against `auth.json`.
//!
//! # Invariants
//! - `password_hash` is present only when `enabled` is true.
//! - Disabled gating verifies every input; a missing file verifies none.

use crate::config::StorageConfig;
use crate::repo::atomic_file::{read_json, write_json_atomic, RepoError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type GateResult<T> = Result<T, GateError>;

/// Credential file could not be read or written.
#[derive(Debug)]
pub struct GateError(RepoError);

impl Display for GateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential store failure: {}", self.0)
    }
}

impl Error for GateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<RepoError> for GateError {
    fn from(value: RepoError) -> Self {
        Self(value)
    }
}

/// On-disk shape of `auth.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// Gate over the credential file in the data directory.
#[derive(Debug, Clone)]
pub struct PasswordGate {
    path: PathBuf,
}

impl PasswordGate {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: config.auth_file(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether first-run setup (set or skip) has happened.
    pub fn is_configured(&self) -> bool {
        self.path.exists()
    }

    /// Stores the hash of `plaintext` and enables gating.
    pub fn set_password(&self, plaintext: &str) -> GateResult<()> {
        let record = CredentialRecord {
            enabled: true,
            password_hash: Some(hash_passphrase(plaintext)),
        };
        write_json_atomic(&self.path, &record)?;
        info!("event=gate_configure module=auth status=ok enabled=true");
        Ok(())
    }

    /// Records that the store is used without a passphrase.
    pub fn skip_password(&self) -> GateResult<()> {
        let record = CredentialRecord {
            enabled: false,
            password_hash: None,
        };
        write_json_atomic(&self.path, &record)?;
        info!("event=gate_configure module=auth status=ok enabled=false");
        Ok(())
    }

    /// Absent file reads as disabled.
    pub fn is_enabled(&self) -> GateResult<bool> {
        Ok(self.read_record()?.is_some_and(|record| record.enabled))
    }

    /// Checks `plaintext` against the stored hash.
    pub fn verify(&self, plaintext: &str) -> GateResult<bool> {
        let Some(record) = self.read_record()? else {
            warn!("event=gate_verify module=auth status=unconfigured");
            return Ok(false);
        };
        if !record.enabled {
            return Ok(true);
        }

        let matched = record.password_hash.as_deref() == Some(hash_passphrase(plaintext).as_str());
        if matched {
            info!("event=gate_verify module=auth status=ok");
        } else {
            warn!("event=gate_verify module=auth status=rejected");
        }
        Ok(matched)
    }

    fn read_record(&self) -> GateResult<Option<CredentialRecord>> {
        Ok(read_json(&self.path)?)
    }
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `plaintext`.
pub fn hash_passphrase(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}
