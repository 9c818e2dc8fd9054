//! Store repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Load the persisted store document, or report that none exists yet.
//! - Save the full document in one atomic replace.
//!
//! # Invariants
//! - `load` returns documents with a repaired `next_id`, unique note ids,
//!   and a folder list holding the virtual folder, the fallback folder and
//!   every folder a note references.
//! - `save` never leaves a partially written notes file behind.

use super::atomic_file::{read_json, write_json_atomic, RepoResult};
use crate::config::StorageConfig;
use crate::model::note::StoreDocument;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Persistence contract used by `NoteStore`.
pub trait StoreRepository {
    /// Returns the persisted document, or `None` on first run.
    fn load(&self) -> RepoResult<Option<StoreDocument>>;
    /// Replaces the persisted document with `document`.
    fn save(&self, document: &StoreDocument) -> RepoResult<()>;
}

/// `notes.json` backed repository.
#[derive(Debug, Clone)]
pub struct JsonFileStoreRepository {
    path: PathBuf,
}

impl JsonFileStoreRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository for the notes file under `config`'s data directory.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.notes_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreRepository for JsonFileStoreRepository {
    fn load(&self) -> RepoResult<Option<StoreDocument>> {
        let started_at = Instant::now();
        let loaded = read_json::<StoreDocument>(&self.path);
        match loaded {
            Ok(Some(mut document)) => {
                let counter_moved = document.normalize_next_id();
                let renumbered = document.reassign_duplicate_ids();
                let folders_fixed = document.repair_folders();
                if counter_moved || renumbered > 0 || folders_fixed {
                    warn!(
                        "event=store_load module=repo status=repaired next_id={} renumbered={} folders_fixed={}",
                        document.next_id,
                        renumbered,
                        folders_fixed
                    );
                }
                info!(
                    "event=store_load module=repo status=ok folders={} notes={} duration_ms={}",
                    document.folders.len(),
                    document.notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(document))
            }
            Ok(None) => {
                info!("event=store_load module=repo status=absent");
                Ok(None)
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=store_read_failed error={}",
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, document: &StoreDocument) -> RepoResult<()> {
        let started_at = Instant::now();
        match write_json_atomic(&self.path, document) {
            Ok(()) => {
                info!(
                    "event=store_save module=repo status=ok notes={} duration_ms={}",
                    document.notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=repo status=error error_code=store_write_failed error={}",
                    err
                );
                Err(err)
            }
        }
    }
}
