//! In-memory storage backend.
//!
//! The injectable test double: per-user activity vecs plus a meta map behind
//! `parking_lot` mutexes. Uncontended locks are near-zero overhead, and no
//! lock is held across an await point.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Result;
use crate::types::StoredEntry;

use super::traits::StorageBackend;

#[derive(Default)]
pub struct MemoryBackend {
    /// user id → entries in insertion order
    activities: Mutex<HashMap<String, Vec<StoredEntry>>>,
    meta: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entry count across all users.
    pub fn entry_count(&self) -> usize {
        self.activities.lock().values().map(Vec::len).sum()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn append_activity(&self, user_id: &str, payload: &Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.activities
            .lock()
            .entry(user_id.to_string())
            .or_default()
            .push(StoredEntry {
                id: id.clone(),
                payload: payload.clone(),
            });
        Ok(id)
    }

    async fn fetch_activities(&self, user_id: &str) -> Result<Vec<StoredEntry>> {
        Ok(self
            .activities
            .lock()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_meta(&self, key: &str) -> Result<Option<String>> {
        Ok(self.meta.lock().get(key).cloned())
    }

    async fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.meta.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
