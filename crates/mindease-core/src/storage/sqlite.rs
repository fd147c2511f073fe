//! SQLite-backed key-value store.
//!
//! Persists the same string entries a browser would keep in local storage,
//! in a single `kv` table at `~/.config/mindease/mindease.db`.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStore};
use crate::error::StorageError;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `<data dir>/mindease.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("mindease.db"))
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get("test").unwrap().is_none());
        store.set("test", "hello").unwrap();
        assert_eq!(store.get("test").unwrap().unwrap(), "hello");
        store.set("test", "world").unwrap();
        assert_eq!(store.get("test").unwrap().unwrap(), "world");
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mindease.db");
        {
            let store = SqliteStore::open_at(&path).unwrap();
            store.set("currentMood", "Calm").unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(store.get("currentMood").unwrap().as_deref(), Some("Calm"));
    }
}
