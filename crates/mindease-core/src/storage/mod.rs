mod config;
mod memory;
mod sqlite;

pub use config::{BreathingConfig, Config, SoundConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Key holding the most recently selected mood (plain string).
pub const CURRENT_MOOD_KEY: &str = "currentMood";
/// Key holding the JSON-encoded progress state.
pub const PROGRESS_KEY: &str = "mindease_progress";
/// Key holding the breathing sound flag (`"true"` / `"false"`).
pub const SOUND_KEY: &str = "breathingSound";

/// String-valued key-value storage.
///
/// The core only ever needs `get` and `set`; backends decide where the
/// strings live. Callers treat failures as non-fatal.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/mindease[-dev]/` based on MINDEASE_ENV.
///
/// Set MINDEASE_ENV=dev to use the development data directory, or
/// MINDEASE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("MINDEASE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("MINDEASE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("mindease-dev")
            } else {
                base_dir.join("mindease")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
