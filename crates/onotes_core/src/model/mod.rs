//! Domain model for folders and notes.
//!
//! # Responsibility
//! - Define the note record and the whole-store document persisted to disk.
//! - Name the distinguished folders the store relies on.
//!
//! # Invariants
//! - Note ids are never reused within a store; they come from `next_id`.
//! - Deletion is permanent; there is no tombstone state.

pub mod note;
