//! Folder/note store use-case service.
//!
//! # Responsibility
//! - Own the in-memory store document and persist it on every mutation.
//! - Enforce note/folder referential integrity.
//!
//! # Invariants
//! - Every note folder is `VIRTUAL_FOLDER` or a name listed in `folders`.
//! - Ids come from the persisted `next_id` counter and are never reused.
//! - A mutation becomes visible only after its save succeeded; a failed save
//!   leaves the in-memory state untouched.
//! - `VIRTUAL_FOLDER` and `FALLBACK_FOLDER` cannot be deleted.

use crate::config::StorageConfig;
use crate::model::note::{
    now_local, title_or_placeholder, Note, NoteId, StoreDocument, FALLBACK_FOLDER,
    VIRTUAL_FOLDER,
};
use crate::repo::atomic_file::RepoError;
use crate::repo::store_repo::{JsonFileStoreRepository, StoreRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Service error for store use-cases.
///
/// Expected rejections (unknown id, bad folder name, protected folder) are not
/// errors; they surface as `None`/`false` return values.
#[derive(Debug)]
pub enum NoteStoreError {
    /// Target folder is neither virtual nor listed.
    UnknownFolder(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFolder(name) => write!(f, "folder does not exist: `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::UnknownFolder(_) => None,
        }
    }
}

impl From<RepoError> for NoteStoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Store facade over a repository implementation.
pub struct NoteStore<R: StoreRepository> {
    repo: R,
    document: StoreDocument,
}

impl NoteStore<JsonFileStoreRepository> {
    /// Opens the store backed by `notes.json` under `config`.
    pub fn open(config: &StorageConfig) -> NoteStoreResult<Self> {
        Self::load(JsonFileStoreRepository::from_config(config))
    }
}

impl<R: StoreRepository> NoteStore<R> {
    /// Loads persisted state, or seeds default folders on first run.
    ///
    /// The seeded state is not written until the first mutation.
    pub fn load(repo: R) -> NoteStoreResult<Self> {
        let document = repo.load()?.unwrap_or_else(StoreDocument::seeded);
        Ok(Self { repo, document })
    }

    /// Re-reads persisted state, discarding the in-memory document.
    pub fn reload(&mut self) -> NoteStoreResult<()> {
        self.document = self.repo.load()?.unwrap_or_else(StoreDocument::seeded);
        Ok(())
    }

    /// Folder names in display order, virtual folder included.
    pub fn folders(&self) -> &[String] {
        &self.document.folders
    }

    /// All notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.document.notes
    }

    pub fn document(&self) -> &StoreDocument {
        &self.document
    }

    pub fn get_note(&self, id: NoteId) -> Option<&Note> {
        self.document.notes.iter().find(|note| note.id == id)
    }

    /// Adds a note and persists it.
    ///
    /// # Errors
    /// - `UnknownFolder` when `folder` is neither virtual nor listed.
    /// - `Repo` when the document cannot be saved.
    pub fn add_note(&mut self, title: &str, content: &str, folder: &str) -> NoteStoreResult<Note> {
        if folder != VIRTUAL_FOLDER && !self.has_folder(folder) {
            return Err(NoteStoreError::UnknownFolder(folder.to_string()));
        }

        let mut next = self.document.clone();
        let note = Note::new(next.next_id, title, content, folder);
        next.next_id += 1;
        next.notes.push(note.clone());
        self.commit(next)?;

        info!(
            "event=note_add module=store status=ok note_id={} folder={}",
            note.id, note.folder
        );
        Ok(note)
    }

    /// Replaces title and content of one note.
    ///
    /// Returns `Ok(None)` without writing when `id` does not exist.
    pub fn update_note(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
    ) -> NoteStoreResult<Option<Note>> {
        let Some(index) = self.position_of(id) else {
            warn!("event=note_update module=store status=not_found note_id={id}");
            return Ok(None);
        };

        let mut next = self.document.clone();
        let note = &mut next.notes[index];
        note.title = title_or_placeholder(title);
        note.content = content.to_string();
        note.modified = now_local().max(note.created);
        let updated = note.clone();
        self.commit(next)?;

        info!("event=note_update module=store status=ok note_id={id}");
        Ok(Some(updated))
    }

    /// Removes one note permanently.
    ///
    /// Returns whether a note was removed; an unknown id is a silent no-op.
    pub fn delete_note(&mut self, id: NoteId) -> NoteStoreResult<bool> {
        let Some(index) = self.position_of(id) else {
            return Ok(false);
        };

        let mut next = self.document.clone();
        next.notes.remove(index);
        self.commit(next)?;

        info!("event=note_delete module=store status=ok note_id={id}");
        Ok(true)
    }

    /// Notes shown for `folder`, in insertion order.
    ///
    /// The virtual folder yields every note.
    pub fn notes_in(&self, folder: &str) -> Vec<&Note> {
        self.document
            .notes
            .iter()
            .filter(|note| folder == VIRTUAL_FOLDER || note.folder == folder)
            .collect()
    }

    /// `notes_in` with the most recently created note first.
    pub fn notes_in_display_order(&self, folder: &str) -> Vec<&Note> {
        let mut notes = self.notes_in(folder);
        notes.reverse();
        notes
    }

    pub fn note_count_in(&self, folder: &str) -> usize {
        self.notes_in(folder).len()
    }

    /// Appends a folder.
    ///
    /// Returns `false` for an empty or already listed name (case-sensitive).
    pub fn add_folder(&mut self, name: &str) -> NoteStoreResult<bool> {
        if name.is_empty() || self.has_folder(name) {
            warn!("event=folder_add module=store status=rejected reason=invalid_name");
            return Ok(false);
        }

        let mut next = self.document.clone();
        next.folders.push(name.to_string());
        self.commit(next)?;

        info!("event=folder_add module=store status=ok folder={name}");
        Ok(true)
    }

    /// Deletes a folder and moves its notes to `FALLBACK_FOLDER`.
    ///
    /// Returns `false` without writing for the virtual folder, the fallback
    /// folder, and names that are not listed.
    pub fn delete_folder(&mut self, name: &str) -> NoteStoreResult<bool> {
        if is_protected_folder(name) {
            warn!(
                "event=folder_delete module=store status=rejected reason=protected folder={name}"
            );
            return Ok(false);
        }
        let Some(index) = self.document.folders.iter().position(|f| f == name) else {
            return Ok(false);
        };

        let mut next = self.document.clone();
        let mut moved = 0usize;
        for note in next.notes.iter_mut().filter(|note| note.folder == name) {
            note.folder = FALLBACK_FOLDER.to_string();
            moved += 1;
        }
        next.folders.remove(index);
        self.commit(next)?;

        info!("event=folder_delete module=store status=ok folder={name} moved_notes={moved}");
        Ok(true)
    }

    fn has_folder(&self, name: &str) -> bool {
        self.document.folders.iter().any(|folder| folder == name)
    }

    fn position_of(&self, id: NoteId) -> Option<usize> {
        self.document.notes.iter().position(|note| note.id == id)
    }

    fn commit(&mut self, next: StoreDocument) -> NoteStoreResult<()> {
        self.repo.save(&next)?;
        self.document = next;
        Ok(())
    }
}

/// Folders `delete_folder` always refuses.
pub fn is_protected_folder(name: &str) -> bool {
    name == VIRTUAL_FOLDER || name == FALLBACK_FOLDER
}

#[cfg(test)]
mod tests {
    use super::{is_protected_folder, NoteStore};
    use crate::model::note::StoreDocument;
    use crate::repo::atomic_file::RepoResult;
    use crate::repo::store_repo::StoreRepository;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryRepo {
        saved: RefCell<Vec<StoreDocument>>,
    }

    impl StoreRepository for &MemoryRepo {
        fn load(&self) -> RepoResult<Option<StoreDocument>> {
            Ok(self.saved.borrow().last().cloned())
        }

        fn save(&self, document: &StoreDocument) -> RepoResult<()> {
            self.saved.borrow_mut().push(document.clone());
            Ok(())
        }
    }

    #[test]
    fn protected_folders_are_virtual_and_fallback() {
        assert!(is_protected_folder("All Notes"));
        assert!(is_protected_folder("Personal"));
        assert!(!is_protected_folder("Work"));
    }

    #[test]
    fn rejected_operations_do_not_write() {
        let repo = MemoryRepo::default();
        let mut store = NoteStore::load(&repo).expect("load");

        assert!(!store.add_folder("").expect("add empty"));
        assert!(!store.add_folder("Work").expect("add duplicate"));
        assert!(!store.delete_folder("All Notes").expect("delete virtual"));
        assert!(!store.delete_folder("Missing").expect("delete missing"));
        assert!(store.update_note(99, "t", "c").expect("update").is_none());
        assert!(!store.delete_note(99).expect("delete note"));

        assert!(repo.saved.borrow().is_empty());
    }

    #[test]
    fn every_mutation_writes_the_full_document() {
        let repo = MemoryRepo::default();
        let mut store = NoteStore::load(&repo).expect("load");

        store.add_note("a", "", "Work").expect("add");
        store.add_folder("Ideas").expect("add folder");

        let saved = repo.saved.borrow();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].notes.len(), 1);
        assert!(saved[1].folders.iter().any(|folder| folder == "Ideas"));
    }
}
