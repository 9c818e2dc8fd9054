//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `onotes_core` linkage and the resolved data directory.
//! - Print store counts without a UI, never writing any state.

use onotes_core::{NoteStore, PasswordGate, StorageConfig, VIRTUAL_FOLDER};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("onotes_core ping={}", onotes_core::ping());
    println!("onotes_core version={}", onotes_core::core_version());

    let config = match StorageConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("data_dir={}", config.data_dir().display());

    let gate = PasswordGate::new(&config);
    match gate.is_enabled() {
        Ok(enabled) => println!("gate configured={} enabled={enabled}", gate.is_configured()),
        Err(err) => eprintln!("gate error: {err}"),
    }

    match NoteStore::open(&config) {
        Ok(store) => {
            for folder in store.folders() {
                println!("folder={folder} notes={}", store.note_count_in(folder));
            }
            println!("total_notes={}", store.note_count_in(VIRTUAL_FOLDER));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("store error: {err}");
            ExitCode::FAILURE
        }
    }
}
