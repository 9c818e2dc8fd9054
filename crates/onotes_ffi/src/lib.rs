//! UI shell integration boundary for onotes.

pub mod api;
pub mod session;

pub use session::{EditAction, OpenEditor, Severity, ShellEvent, ShellResponse, ShellSession};
