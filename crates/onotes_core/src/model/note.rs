//! Note and store document model.
//!
//! # Responsibility
//! - Define the canonical note record shared by the store and the UI shell.
//! - Define the persisted whole-state document (`folders`, `notes`, `next_id`).
//!
//! # Invariants
//! - `created == modified` at creation; `modified` moves forward on update.
//! - `folder` is either `VIRTUAL_FOLDER` or a name listed in `folders`.
//! - `next_id` is strictly greater than every persisted note id.
//! - Note ids are unique within one document.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable identifier of one note inside a store.
pub type NoteId = u64;

/// Aggregate view over every note. Never a real container, never deletable.
pub const VIRTUAL_FOLDER: &str = "All Notes";
/// Target for notes whose folder is deleted.
pub const FALLBACK_FOLDER: &str = "Personal";
/// Folders a brand-new store starts with.
pub const SEED_FOLDERS: [&str; 3] = [VIRTUAL_FOLDER, FALLBACK_FOLDER, "Work"];
/// Title stored when the caller passes a blank one.
pub const UNTITLED_NOTE: &str = "Untitled Note";

const PREVIEW_CHARS: usize = 50;

/// One persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Plain multi-line text.
    pub content: String,
    pub folder: String,
    /// Local time, serialized as ISO-8601 without offset.
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
}

impl Note {
    /// Creates a note stamped with the current local time.
    pub fn new(id: NoteId, title: &str, content: impl Into<String>, folder: &str) -> Self {
        let now = now_local();
        Self {
            id,
            title: title_or_placeholder(title),
            content: content.into(),
            folder: folder.to_string(),
            created: now,
            modified: now,
        }
    }

    /// First 50 characters of content on a single line, `...` when cut.
    pub fn preview(&self) -> String {
        let head: String = self
            .content
            .chars()
            .take(PREVIEW_CHARS)
            .collect::<String>()
            .replace('\n', " ");
        if self.content.chars().count() > PREVIEW_CHARS {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Short date label for note lists, e.g. `Mar 04, 2025`.
    pub fn modified_label(&self) -> String {
        self.modified.format("%b %d, %Y").to_string()
    }
}

/// Whole-state document rewritten on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub folders: Vec<String>,
    pub notes: Vec<Note>,
    /// Absent in files written before ids became counter-based.
    #[serde(default)]
    pub next_id: NoteId,
}

impl StoreDocument {
    /// Document for a store that has never been saved.
    pub fn seeded() -> Self {
        Self {
            folders: SEED_FOLDERS.iter().map(|name| name.to_string()).collect(),
            notes: Vec::new(),
            next_id: 1,
        }
    }

    /// Repairs `next_id` so that it is above every existing id.
    ///
    /// Returns whether the counter had to move.
    pub fn normalize_next_id(&mut self) -> bool {
        let floor = self
            .notes
            .iter()
            .map(|note| note.id)
            .max()
            .map_or(1, |max| max + 1);
        if self.next_id < floor {
            self.next_id = floor;
            return true;
        }
        false
    }

    /// Gives every repeated note id after the first a fresh counter value.
    ///
    /// Returns the number of notes that were renumbered.
    pub fn reassign_duplicate_ids(&mut self) -> usize {
        self.normalize_next_id();
        let mut seen = HashSet::new();
        let mut renumbered = 0;
        for note in &mut self.notes {
            if !seen.insert(note.id) {
                note.id = self.next_id;
                self.next_id += 1;
                seen.insert(note.id);
                renumbered += 1;
            }
        }
        renumbered
    }

    /// Restores the folder list around what the notes reference.
    ///
    /// `VIRTUAL_FOLDER` goes first and `FALLBACK_FOLDER` right after it when
    /// missing; folders that notes point at but that are not listed are
    /// appended; notes with a blank folder move to `FALLBACK_FOLDER`.
    /// Returns whether anything changed.
    pub fn repair_folders(&mut self) -> bool {
        let mut changed = false;
        if !self.folders.iter().any(|name| name == VIRTUAL_FOLDER) {
            self.folders.insert(0, VIRTUAL_FOLDER.to_string());
            changed = true;
        }
        if !self.folders.iter().any(|name| name == FALLBACK_FOLDER) {
            let at = self
                .folders
                .iter()
                .position(|name| name == VIRTUAL_FOLDER)
                .map_or(0, |index| index + 1);
            self.folders.insert(at, FALLBACK_FOLDER.to_string());
            changed = true;
        }
        for note in &mut self.notes {
            if note.folder.is_empty() {
                note.folder = FALLBACK_FOLDER.to_string();
                changed = true;
            } else if !self.folders.contains(&note.folder) {
                self.folders.push(note.folder.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Returns `title` unless it is empty, in which case the placeholder.
pub fn title_or_placeholder(title: &str) -> String {
    if title.is_empty() {
        UNTITLED_NOTE.to_string()
    } else {
        title.to_string()
    }
}

pub(crate) fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::{Note, StoreDocument, UNTITLED_NOTE, VIRTUAL_FOLDER};
    use chrono::NaiveDate;

    #[test]
    fn new_note_defaults_blank_title_and_matches_timestamps() {
        let note = Note::new(7, "", "body", "Work");
        assert_eq!(note.title, UNTITLED_NOTE);
        assert_eq!(note.created, note.modified);
    }

    #[test]
    fn preview_flattens_newlines_and_marks_truncation() {
        let mut note = Note::new(1, "t", "one\ntwo", "Work");
        assert_eq!(note.preview(), "one two");

        note.content = "x".repeat(51);
        let preview = note.preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 53);

        note.content = "y".repeat(50);
        assert_eq!(note.preview(), "y".repeat(50));
    }

    #[test]
    fn modified_label_uses_short_month_format() {
        let mut note = Note::new(1, "t", "", "Work");
        note.modified = NaiveDate::from_ymd_opt(2025, 3, 4)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid date");
        assert_eq!(note.modified_label(), "Mar 04, 2025");
    }

    #[test]
    fn legacy_document_without_counter_is_repaired() {
        let raw = r#"{
            "folders": ["All Notes", "Personal"],
            "notes": [{
                "id": 4,
                "title": "Old",
                "content": "",
                "folder": "Personal",
                "created": "2024-01-02T03:04:05.123456",
                "modified": "2024-01-02T03:04:05.123456"
            }]
        }"#;
        let mut document: StoreDocument = serde_json::from_str(raw).expect("legacy doc parses");
        assert_eq!(document.next_id, 0);
        assert!(document.normalize_next_id());
        assert_eq!(document.next_id, 5);
        assert!(!document.normalize_next_id());
    }

    fn note_with(id: u64, folder: &str) -> Note {
        Note::new(id, "t", "", folder)
    }

    #[test]
    fn duplicate_ids_after_the_first_are_renumbered() {
        let mut document = StoreDocument {
            folders: vec!["All Notes".into(), "Personal".into(), "Work".into()],
            notes: vec![note_with(1, "Work"), note_with(1, "Personal"), note_with(2, "Work")],
            next_id: 2,
        };

        assert_eq!(document.reassign_duplicate_ids(), 1);
        let ids: Vec<u64> = document.notes.iter().map(|note| note.id).collect();
        assert_eq!(ids, [1, 3, 2]);
        assert_eq!(document.next_id, 4);
        assert_eq!(document.reassign_duplicate_ids(), 0);
    }

    #[test]
    fn missing_folders_are_restored_around_note_references() {
        let mut document = StoreDocument {
            folders: vec!["Work".into()],
            notes: vec![note_with(1, "Work"), note_with(2, "Trips"), note_with(3, "")],
            next_id: 4,
        };

        assert!(document.repair_folders());
        assert_eq!(document.folders, ["All Notes", "Personal", "Work", "Trips"]);
        assert_eq!(document.notes[2].folder, "Personal");
        assert!(!document.repair_folders());
    }

    #[test]
    fn seeded_document_lists_virtual_folder_first() {
        let document = StoreDocument::seeded();
        assert_eq!(document.folders[0], VIRTUAL_FOLDER);
        assert_eq!(document.next_id, 1);
        assert!(document.notes.is_empty());
    }
}
