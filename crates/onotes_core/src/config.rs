//! Storage configuration for note and credential files.
//!
//! # Responsibility
//! - Resolve the per-user data directory once, explicitly, at startup.
//! - Derive every on-disk path (notes, credentials, logs) from one root.
//!
//! # Invariants
//! - Core components never read a global path; they receive a `StorageConfig`.
//! - `ONOTES_DATA_DIR` overrides the home-directory default when not blank.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the default data directory.
pub const DATA_DIR_ENV: &str = "ONOTES_DATA_DIR";

const DEFAULT_DIR_NAME: &str = ".notes_tui";
const NOTES_FILE_NAME: &str = "notes.json";
const AUTH_FILE_NAME: &str = "auth.json";
const LOG_DIR_NAME: &str = "logs";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    /// Neither the override variable nor a home directory is available.
    NoHomeDirectory,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirectory => write!(
                f,
                "cannot resolve data directory: set {DATA_DIR_ENV} or a home directory"
            ),
            Self::Io { path, source } => {
                write!(f, "failed to prepare `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoHomeDirectory => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Root directory holding all persisted application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    data_dir: PathBuf,
}

impl StorageConfig {
    /// Uses `data_dir` as-is. The directory is not created here.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the data directory from `ONOTES_DATA_DIR`, falling back to
    /// `<home>/.notes_tui`.
    pub fn from_env() -> ConfigResult<Self> {
        if let Ok(raw) = std::env::var(DATA_DIR_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(Self::new(trimmed));
            }
        }

        dirs::home_dir()
            .map(|home| Self::new(home.join(DEFAULT_DIR_NAME)))
            .ok_or(ConfigError::NoHomeDirectory)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn notes_file(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE_NAME)
    }

    pub fn auth_file(&self) -> PathBuf {
        self.data_dir.join(AUTH_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Creates the data directory tree on first run.
    ///
    /// # Errors
    /// - Returns `ConfigError::Io` when the directory cannot be created.
    pub fn ensure_data_dir(&self) -> ConfigResult<()> {
        if self.data_dir.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.data_dir).map_err(|source| ConfigError::Io {
            path: self.data_dir.clone(),
            source,
        })?;
        info!(
            "event=data_dir_create module=config status=ok path={}",
            self.data_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StorageConfig;

    #[test]
    fn derived_paths_share_the_data_dir() {
        let config = StorageConfig::new("/tmp/onotes-config");
        assert!(config.notes_file().ends_with("notes.json"));
        assert!(config.auth_file().ends_with("auth.json"));
        assert!(config.log_dir().ends_with("logs"));
        assert_eq!(config.notes_file().parent(), Some(config.data_dir()));
    }

    #[test]
    fn ensure_data_dir_creates_nested_directories() {
        let root = tempfile::tempdir().expect("temp dir should be created");
        let config = StorageConfig::new(root.path().join("a").join("b"));

        config.ensure_data_dir().expect("nested dir should be created");
        config.ensure_data_dir().expect("second call should be a no-op");
        assert!(config.data_dir().is_dir());
    }
}
