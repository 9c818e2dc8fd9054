//! Write-to-temp-then-rename helpers for JSON state files.
//!
//! # Invariants
//! - The target file is either the previous content or the new content,
//!   never a truncated mix.
//! - The temp file lives in the target directory so `persist` is a rename.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for JSON state files.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    /// File exists but does not hold a valid document.
    InvalidData {
        path: PathBuf,
        message: String,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to serialize state: {err}"),
            Self::InvalidData { path, message } => {
                write!(f, "invalid data in `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Reads and parses a JSON file; `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> RepoResult<Option<T>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| RepoError::InvalidData {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

/// Serializes `value` as pretty JSON and atomically replaces `path`.
///
/// # Errors
/// - `Serialize` when `value` cannot be encoded.
/// - `Io` when the parent directory is missing or the write/rename fails.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> RepoResult<()> {
    let payload = serde_json::to_vec_pretty(value)?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_err = |source: std::io::Error| RepoError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&payload).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}
