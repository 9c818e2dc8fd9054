//! Core domain logic for onotes.
//! This crate is the single source of truth for note/folder invariants,
//! the passphrase gate and the wrapping editor buffer.

pub mod auth;
pub mod config;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::password_gate::{
    hash_passphrase, CredentialRecord, GateError, GateResult, PasswordGate,
};
pub use config::{ConfigError, ConfigResult, StorageConfig, DATA_DIR_ENV};
pub use editor::wrap_buffer::{
    CursorMove, Position, WrappingTextBuffer, DEFAULT_MAX_LINE_LENGTH,
};
pub use logging::{default_log_level, init_logging, init_logging_for, logging_status};
pub use model::note::{
    Note, NoteId, StoreDocument, FALLBACK_FOLDER, SEED_FOLDERS, UNTITLED_NOTE, VIRTUAL_FOLDER,
};
pub use repo::atomic_file::{RepoError, RepoResult};
pub use repo::store_repo::{JsonFileStoreRepository, StoreRepository};
pub use service::note_store::{is_protected_folder, NoteStore, NoteStoreError, NoteStoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
