//! Shell session: one dispatch function over a sum type of UI events.
//!
//! # Responsibility
//! - Hold what the UI shell shows: current folder and the open note editor.
//! - Translate UI events into store and buffer operations.
//!
//! # Invariants
//! - Buffer edits reach the store only through `ShellEvent::SaveNote`.
//! - `handle_event` never panics; failures become `ShellResponse` values.
//! - Deleting the selected folder falls back to the virtual folder.

use log::error;
use onotes_core::{
    is_protected_folder, CursorMove, JsonFileStoreRepository, NoteId, NoteStore, NoteStoreError,
    StorageConfig, StoreRepository, WrappingTextBuffer, UNTITLED_NOTE, VIRTUAL_FOLDER,
};

/// Keystroke-level edit forwarded to the open buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Paste(String),
    Newline,
    Backspace,
    Delete,
    Move(CursorMove),
}

/// Every UI interaction the core reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Index into the folder list.
    SelectFolder(usize),
    OpenNote(NoteId),
    NewNote,
    SetTitle(String),
    Edit(EditAction),
    SaveNote,
    /// Deletes the open note, else the highlighted one.
    DeleteNote { highlighted: Option<NoteId> },
    CreateFolder(String),
    DeleteFolder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Outcome shown to the user as a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellResponse {
    pub ok: bool,
    pub message: String,
    pub severity: Severity,
}

impl ShellResponse {
    fn info(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            severity: Severity::Info,
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    fn failure(action: &str, err: &NoteStoreError) -> Self {
        error!("event=shell_action module=ffi status=error action={action} error={err}");
        Self {
            ok: false,
            message: format!("{action} failed: {err}"),
            severity: Severity::Error,
        }
    }
}

/// Note currently loaded into the editor pane.
#[derive(Debug, Clone)]
pub struct OpenEditor {
    pub note_id: NoteId,
    /// Title field, tracked apart from the buffer.
    pub title: String,
    pub buffer: WrappingTextBuffer,
}

pub struct ShellSession<R: StoreRepository = JsonFileStoreRepository> {
    store: NoteStore<R>,
    current_folder: String,
    editor: Option<OpenEditor>,
}

impl ShellSession<JsonFileStoreRepository> {
    /// Creates the data directory if needed and loads the store.
    pub fn open(config: &StorageConfig) -> Result<Self, String> {
        config.ensure_data_dir().map_err(|err| err.to_string())?;
        let store = NoteStore::open(config).map_err(|err| err.to_string())?;
        Ok(Self::with_store(store))
    }
}

impl<R: StoreRepository> ShellSession<R> {
    pub fn with_store(store: NoteStore<R>) -> Self {
        Self {
            store,
            current_folder: VIRTUAL_FOLDER.to_string(),
            editor: None,
        }
    }

    pub fn store(&self) -> &NoteStore<R> {
        &self.store
    }

    pub fn current_folder(&self) -> &str {
        &self.current_folder
    }

    pub fn editor(&self) -> Option<&OpenEditor> {
        self.editor.as_ref()
    }

    pub fn handle_event(&mut self, event: ShellEvent) -> ShellResponse {
        match event {
            ShellEvent::SelectFolder(index) => self.select_folder(index),
            ShellEvent::OpenNote(id) => self.open_note(id),
            ShellEvent::NewNote => self.new_note(),
            ShellEvent::SetTitle(title) => match self.editor.as_mut() {
                Some(editor) => {
                    editor.title = title;
                    ShellResponse::info("")
                }
                None => ShellResponse::warning("No note selected"),
            },
            ShellEvent::Edit(action) => self.edit(action),
            ShellEvent::SaveNote => self.save_note(),
            ShellEvent::DeleteNote { highlighted } => self.delete_note(highlighted),
            ShellEvent::CreateFolder(name) => self.create_folder(name.trim()),
            ShellEvent::DeleteFolder(name) => self.delete_folder(&name),
        }
    }

    fn select_folder(&mut self, index: usize) -> ShellResponse {
        let Some(folder) = self.store.folders().get(index).cloned() else {
            return ShellResponse::warning("No folder selected");
        };
        self.current_folder = folder;
        self.editor = None;
        ShellResponse::info(format!("Showing '{}'", self.current_folder))
    }

    fn open_note(&mut self, id: NoteId) -> ShellResponse {
        let Some(note) = self.store.get_note(id) else {
            return ShellResponse::warning("Note not found");
        };
        self.editor = Some(OpenEditor {
            note_id: note.id,
            title: note.title.clone(),
            buffer: WrappingTextBuffer::from_text(&note.content),
        });
        ShellResponse::info("")
    }

    fn new_note(&mut self) -> ShellResponse {
        let folder = self.current_folder.clone();
        match self.store.add_note(UNTITLED_NOTE, "", &folder) {
            Ok(note) => {
                self.editor = Some(OpenEditor {
                    note_id: note.id,
                    title: String::new(),
                    buffer: WrappingTextBuffer::new(),
                });
                ShellResponse::info("New note created")
            }
            Err(err) => ShellResponse::failure("new_note", &err),
        }
    }

    fn edit(&mut self, action: EditAction) -> ShellResponse {
        let Some(editor) = self.editor.as_mut() else {
            return ShellResponse::warning("No note selected");
        };
        let buffer = &mut editor.buffer;
        match action {
            EditAction::Insert(ch) => buffer.insert_char(ch),
            EditAction::Paste(text) => buffer.insert_str(&text),
            EditAction::Newline => buffer.insert_newline(),
            EditAction::Backspace => {
                buffer.backspace();
            }
            EditAction::Delete => {
                buffer.delete_forward();
            }
            EditAction::Move(motion) => buffer.move_cursor(motion),
        }
        ShellResponse::info("")
    }

    fn save_note(&mut self) -> ShellResponse {
        let Some(editor) = self.editor.as_ref() else {
            return ShellResponse::warning("No note selected");
        };
        let title = match editor.title.trim() {
            "" => UNTITLED_NOTE,
            trimmed => trimmed,
        };
        match self
            .store
            .update_note(editor.note_id, title, &editor.buffer.text())
        {
            Ok(Some(_)) => ShellResponse::info("Note saved"),
            Ok(None) => ShellResponse::warning("Note no longer exists"),
            Err(err) => ShellResponse::failure("save_note", &err),
        }
    }

    fn delete_note(&mut self, highlighted: Option<NoteId>) -> ShellResponse {
        let Some(id) = self.editor.as_ref().map(|e| e.note_id).or(highlighted) else {
            return ShellResponse::warning("No note selected");
        };
        match self.store.delete_note(id) {
            Ok(_) => {
                self.editor = None;
                ShellResponse::info("Note deleted")
            }
            Err(err) => ShellResponse::failure("delete_note", &err),
        }
    }

    fn create_folder(&mut self, name: &str) -> ShellResponse {
        match self.store.add_folder(name) {
            Ok(true) => ShellResponse::info(format!("Folder '{name}' created")),
            Ok(false) => ShellResponse::warning("Folder already exists or invalid name"),
            Err(err) => ShellResponse::failure("create_folder", &err),
        }
    }

    fn delete_folder(&mut self, name: &str) -> ShellResponse {
        if name.is_empty() {
            return ShellResponse::warning("No folder selected");
        }
        if is_protected_folder(name) {
            return ShellResponse::warning(format!("Cannot delete '{name}' folder"));
        }
        match self.store.delete_folder(name) {
            Ok(true) => {
                if self.current_folder == name {
                    self.current_folder = VIRTUAL_FOLDER.to_string();
                    self.editor = None;
                }
                ShellResponse::info(format!("Folder '{name}' deleted"))
            }
            Ok(false) => ShellResponse::warning(format!("Folder '{name}' not found")),
            Err(err) => ShellResponse::failure("delete_folder", &err),
        }
    }
}
