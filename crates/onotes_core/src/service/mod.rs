//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into store-level operations.
//! - Keep the UI shell decoupled from file format details.

pub mod note_store;
