//! SQLite-backed local key-value store.
//!
//! Holds every piece of persisted application state as a JSON value under a
//! flat key:
//! - `routines`: user-saved routines keyed by id
//! - `current_routine`: id of the selected routine
//! - `notification_ledger`: reminders already delivered
//! - `lock_state`: the lock screen, if active
//!
//! The store has a byte quota over all values. A write that would exceed it
//! is refused and leaves the stored value untouched.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::{CoreError, StorageError};

/// Default quota, the usual browser local-storage allowance.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub const KEY_ROUTINES: &str = "routines";
pub const KEY_CURRENT_ROUTINE: &str = "current_routine";
pub const KEY_LEDGER: &str = "notification_ledger";
pub const KEY_LOCK: &str = "lock_state";

/// Key-value database for application state.
pub struct Database {
    conn: Connection,
    quota_bytes: usize,
}

impl Database {
    /// Open the database at `<data_dir>/equilibrio.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("equilibrio.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
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

    /// Bytes used by every value except the one stored under `key`.
    fn used_bytes_excluding(&self, key: &str) -> Result<usize, StorageError> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM kv WHERE key != ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as usize)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store, refusing writes past the quota.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let required = self.used_bytes_excluding(key)? + value.len();
        if required > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                required,
                quota: self.quota_bytes,
            });
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Read and decode a JSON value.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        match self.kv_get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a JSON value.
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.kv_set(key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_old_value() {
        let db = Database::open_in_memory().unwrap().with_quota(16);
        db.kv_set("a", "0123456789").unwrap();
        let err = db.kv_set("b", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { required: 20, quota: 16, .. }));
        assert!(db.kv_get("b").unwrap().is_none());

        // Overwriting a key only counts the new value.
        db.kv_set("a", "0123456789abcdef").unwrap();
        assert!(db.kv_set("a", "0123456789abcdefg").is_err());
        assert_eq!(db.kv_get("a").unwrap().unwrap(), "0123456789abcdef");
    }

    #[test]
    fn json_helpers_round_trip() {
        let db = Database::open_in_memory().unwrap();
        db.save_json("nums", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = db.load_json("nums").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
        db.kv_set("broken", "{not json").unwrap();
        assert!(db.load_json::<Vec<i32>>("broken").is_err());
    }
}
