//! Shared types and constants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// AES-256 key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-GCM IV length in bytes.
pub const AES_GCM_IV_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// Metadata key under which the serialized encryption key is persisted.
pub const DEFAULT_KEY_META_KEY: &str = "activity-vault.encryption-key";

/// Records returned by a fetch when the query carries no explicit limit.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// One persisted activity entry: the payload exactly as stored (encrypted)
/// plus the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: String,
    pub payload: Value,
}
