//! Startup passphrase gate.
//!
//! # Responsibility
//! - Persist and check the single master passphrase hash.
//!
//! # Invariants
//! - Plaintext passphrases are never stored or logged.
//! - A wrong passphrase is a normal `false`, not an error.

pub mod password_gate;
