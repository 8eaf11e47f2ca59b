//! Local key-value store
//!
//! The persistence gateway writes the whole application state as one
//! opaque blob under a fixed key. The store behind it is pluggable:
//! SQLite on disk for real sessions, a HashMap for tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::StoreError;

/// Minimal key-value contract the gateway needs
pub trait KvStore: Send {
    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store
///
/// A sidecar lock file is held exclusively for the lifetime of the
/// connection, so two sessions cannot clobber each other's snapshot.
pub struct SqliteKv {
    conn: Connection,
    _lock: fs::File,
}

impl SqliteKv {
    /// Open or create the store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_path = path.with_extension("lock");
        let lock = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.try_lock_exclusive().map_err(|_| {
            StoreError::Storage(format!("store is locked by another session: {}", lock_path.display()))
        })?;

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                 key   TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;

        debug!(path = %path.display(), "Opened kv store");
        Ok(Self { conn, _lock: lock })
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
