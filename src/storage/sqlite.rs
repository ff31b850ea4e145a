//! SQLite storage backend.
//!
//! Durable local persistence for activity collections and metadata. The
//! connection sits behind a `parking_lot::Mutex`; every operation completes
//! synchronously inside the lock, and no lock is held across an await point.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::types::StoredEntry;

use super::traits::StorageBackend;

pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (creating if needed) a backend at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(into_storage)?;
        Self::initialize(conn)
    }

    /// Open a fresh in-memory backend, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(into_storage)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS activities (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                payload TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_activities_user ON activities(user_id);
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .map_err(into_storage)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn into_storage(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn append_activity(&self, user_id: &str, payload: &Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let serialized = serde_json::to_string(payload)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.conn
            .lock()
            .execute(
                "INSERT INTO activities (id, user_id, payload) VALUES (?1, ?2, ?3)",
                params![id, user_id, serialized],
            )
            .map_err(into_storage)?;
        Ok(id)
    }

    async fn fetch_activities(&self, user_id: &str) -> Result<Vec<StoredEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, payload FROM activities WHERE user_id = ?1 ORDER BY seq")
            .map_err(into_storage)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                let id: String = row.get(0)?;
                let payload: String = row.get(1)?;
                Ok((id, payload))
            })
            .map_err(into_storage)?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, payload) = row.map_err(into_storage)?;
            let payload: Value = serde_json::from_str(&payload)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            entries.push(StoredEntry { id, payload });
        }
        Ok(entries)
    }

    async fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .lock()
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(into_storage)
            .map_err(Into::into)
    }

    async fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .lock()
            .execute(
                "INSERT INTO meta (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(into_storage)?;
        Ok(())
    }
}
