//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the startup gate, list views and the shell event loop to Dart
//!   via FRB.
//! - Keep error semantics simple: envelopes with `ok` and a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Passphrases are validated non-empty before any hashing.
//! - One `ShellSession` per process; events are applied under its lock.

use crate::session::{Severity, ShellEvent, ShellSession};
use log::error;
use onotes_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    NoteStore, PasswordGate, StorageConfig,
};
use std::sync::{Mutex, OnceLock};

static STORAGE_CONFIG: OnceLock<Result<StorageConfig, String>> = OnceLock::new();
static SHELL_SESSION: Mutex<Option<ShellSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Gate state read before the first screen is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateStatus {
    /// First-run setup (set or skip) has happened.
    pub configured: bool,
    /// A passphrase prompt must be shown.
    pub enabled: bool,
    /// Empty unless the credential file could not be read.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResponse {
    pub ok: bool,
    pub message: String,
}

impl GateResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One row of the note list pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: u64,
    pub title: String,
    /// `Mar 04, 2025` style date of last modification.
    pub modified: String,
    pub preview: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn gate_status() -> GateStatus {
    let gate = match resolve_config() {
        Ok(config) => PasswordGate::new(&config),
        Err(message) => {
            return GateStatus {
                configured: false,
                enabled: false,
                message,
            }
        }
    };
    match gate.is_enabled() {
        Ok(enabled) => GateStatus {
            configured: gate.is_configured(),
            enabled,
            message: String::new(),
        },
        Err(err) => GateStatus {
            configured: gate.is_configured(),
            enabled: true,
            message: format!("gate_status failed: {err}"),
        },
    }
}

/// First-run setup with a passphrase.
#[flutter_rust_bridge::frb(sync)]
pub fn gate_setup(passphrase: String) -> GateResponse {
    if passphrase.is_empty() {
        return GateResponse::failure("Password cannot be empty");
    }
    with_gate("gate_setup", |gate| {
        gate.set_password(&passphrase)
            .map(|()| GateResponse::success("Password set."))
    })
}

/// First-run setup without a passphrase.
#[flutter_rust_bridge::frb(sync)]
pub fn gate_skip() -> GateResponse {
    with_gate("gate_skip", |gate| {
        gate.skip_password()
            .map(|()| GateResponse::success("Password protection disabled."))
    })
}

/// Checks the passphrase entered on the unlock screen.
///
/// A wrong passphrase returns `ok=false` and may be retried indefinitely.
#[flutter_rust_bridge::frb(sync)]
pub fn gate_unlock(passphrase: String) -> GateResponse {
    if passphrase.is_empty() {
        return GateResponse::failure("Password cannot be empty");
    }
    with_gate("gate_unlock", |gate| {
        gate.verify(&passphrase).map(|matched| {
            if matched {
                GateResponse::success("Unlocked.")
            } else {
                GateResponse::failure("Incorrect password")
            }
        })
    })
}

/// Folder names in display order; empty when the store cannot be read.
#[flutter_rust_bridge::frb(sync)]
pub fn list_folders() -> Vec<String> {
    match open_store() {
        Ok(store) => store.folders().to_vec(),
        Err(err) => {
            error!("event=list_folders module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

/// Notes of `folder`, most recent first.
#[flutter_rust_bridge::frb(sync)]
pub fn list_notes(folder: String) -> Vec<NoteListItem> {
    let store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            error!("event=list_notes module=ffi status=error error={err}");
            return Vec::new();
        }
    };
    store
        .notes_in_display_order(&folder)
        .into_iter()
        .map(|note| NoteListItem {
            id: note.id,
            title: note.title.clone(),
            modified: note.modified_label(),
            preview: note.preview(),
        })
        .collect()
}

/// Editor pane state after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub note_id: u64,
    pub title: String,
    pub text: String,
    pub cursor_line: usize,
    pub cursor_column: usize,
}

/// Result of one shell event plus the state the UI redraws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub ok: bool,
    pub message: String,
    pub severity: Severity,
    pub current_folder: String,
    pub editor: Option<EditorView>,
}

/// Applies one UI event to the process-wide shell session.
///
/// The session is opened on first use from the resolved storage config.
/// Folder and note lists are re-read through `list_folders`/`list_notes`.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_dispatch(event: ShellEvent) -> ShellView {
    let mut guard = SHELL_SESSION.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.is_none() {
        match resolve_config().and_then(|config| ShellSession::open(&config)) {
            Ok(session) => *guard = Some(session),
            Err(err) => {
                error!("event=shell_open module=ffi status=error error={err}");
                return ShellView {
                    ok: false,
                    message: format!("shell_open failed: {err}"),
                    severity: Severity::Error,
                    current_folder: String::new(),
                    editor: None,
                };
            }
        }
    }
    let Some(session) = guard.as_mut() else {
        return ShellView {
            ok: false,
            message: "shell session unavailable".to_string(),
            severity: Severity::Error,
            current_folder: String::new(),
            editor: None,
        };
    };

    let response = session.handle_event(event);
    ShellView {
        ok: response.ok,
        message: response.message,
        severity: response.severity,
        current_folder: session.current_folder().to_string(),
        editor: session.editor().map(|open| {
            let cursor = open.buffer.cursor();
            EditorView {
                note_id: open.note_id,
                title: open.title.clone(),
                text: open.buffer.text(),
                cursor_line: cursor.line,
                cursor_column: cursor.column,
            }
        }),
    }
}

fn resolve_config() -> Result<StorageConfig, String> {
    STORAGE_CONFIG
        .get_or_init(|| {
            let config = StorageConfig::from_env().map_err(|err| err.to_string())?;
            config.ensure_data_dir().map_err(|err| err.to_string())?;
            Ok(config)
        })
        .clone()
}

fn open_store() -> Result<NoteStore<onotes_core::JsonFileStoreRepository>, String> {
    let config = resolve_config()?;
    NoteStore::open(&config).map_err(|err| err.to_string())
}

fn with_gate(
    action: &str,
    f: impl FnOnce(&PasswordGate) -> onotes_core::GateResult<GateResponse>,
) -> GateResponse {
    let config = match resolve_config() {
        Ok(config) => config,
        Err(message) => return GateResponse::failure(format!("{action} failed: {message}")),
    };
    match f(&PasswordGate::new(&config)) {
        Ok(response) => response,
        Err(err) => {
            error!("event={action} module=ffi status=error error={err}");
            GateResponse::failure(format!("{action} failed: {err}"))
        }
    }
}
