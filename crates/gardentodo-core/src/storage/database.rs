//! SQLite-backed key-value storage.
//!
//! The whole task store lives in a single row of the `kv` table, the same way a
//! browser keeps one string under one `localStorage` key.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{data_dir, KeyValueStore};
use crate::error::{CoreError, DatabaseError};

/// SQLite database holding string blobs by key.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/gardentodo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("gardentodo.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.kv_set(key, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("gardenTodo").unwrap(), None);
        db.kv_set("gardenTodo", "{}").unwrap();
        assert_eq!(db.kv_get("gardenTodo").unwrap(), Some("{}".to_string()));
        db.kv_set("gardenTodo", "{\"a\":1}").unwrap();
        assert_eq!(
            db.kv_get("gardenTodo").unwrap(),
            Some("{\"a\":1}".to_string())
        );
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gardentodo.db");
        {
            let mut db = Database::open_at(&path).unwrap();
            KeyValueStore::set(&mut db, "k", "v").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(KeyValueStore::get(&db, "k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn open_at_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/gardentodo.db");
        let err = Database::open_at(&path).err().unwrap();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::OpenFailed { .. })
        ));
    }
}
