pub mod activity;
pub mod cipher;
pub mod error;
pub mod keys;
pub mod storage;
pub mod types;

pub use activity::{ActivityLogger, ActivityQuery, ActivityRecord, ActivityType, LoggedActivity};
pub use cipher::{generate_iv, ObjectCipher, MAX_DEPTH};
pub use error::{CryptoError, Result, StorageError, VaultError};
pub use keys::{KeyMaterial, KeyProvider, SerializedKey};
pub use storage::{MemoryBackend, StorageBackend};
#[cfg(feature = "sqlite")]
pub use storage::SqliteBackend;
pub use types::{
    StoredEntry, AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, DEFAULT_KEY_META_KEY,
    DEFAULT_QUERY_LIMIT,
};
