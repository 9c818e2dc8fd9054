//! Text editing engine for a single open note.
//!
//! # Responsibility
//! - Own the line/cursor state the UI shell renders.
//! - Keep the cursor line within `max_line_length` as the user types.
//!
//! # Invariants
//! - Buffers are independent of the store; edits reach a note only on save.

pub mod wrap_buffer;
