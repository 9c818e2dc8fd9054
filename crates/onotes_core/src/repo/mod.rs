//! Persistence layer for the note store.
//!
//! # Responsibility
//! - Define the load/save contract the store is written against.
//! - Keep file format and write-replace details out of `NoteStore`.
//!
//! # Invariants
//! - Every save rewrites the whole document through a temp-file rename.
//! - I/O and parse failures are returned, never swallowed.

pub mod atomic_file;
pub mod store_repo;
