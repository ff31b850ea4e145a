//! Storage backend trait.
//!
//! A backend persists two things: append-only per-user activity collections
//! and a small string metadata table (which holds the serialized encryption
//! key). Implementations must never mutate or remove an appended entry.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::StoredEntry;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Append one activity payload to a user's collection.
    /// Returns the store-assigned entry id.
    async fn append_activity(&self, user_id: &str, payload: &Value) -> Result<String>;

    /// Fetch every entry in a user's collection, in insertion order.
    /// An unknown user yields an empty vec.
    async fn fetch_activities(&self, user_id: &str) -> Result<Vec<StoredEntry>>;

    /// Read a metadata value.
    async fn get_meta(&self, key: &str) -> Result<Option<String>>;

    /// Write a metadata value.
    async fn set_meta(&self, key: &str, value: &str) -> Result<()>;
}
