//! Lazy get-or-create of the single durable encryption key.
//!
//! The serialized key lives in one meta-storage entry on the injected
//! backend. It is created on first use and never rotated or deleted.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cipher::ObjectCipher;
use crate::error::{CryptoError, Result};
use crate::storage::StorageBackend;
use crate::types::DEFAULT_KEY_META_KEY;

use super::material::{KeyMaterial, SerializedKey};

/// Provides the durable symmetric key, creating it lazily on first use.
pub struct KeyProvider {
    backend: Arc<dyn StorageBackend>,
    meta_key: String,
    cached: Mutex<Option<KeyMaterial>>,
}

impl KeyProvider {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_meta_key(backend, DEFAULT_KEY_META_KEY)
    }

    /// Use a non-default meta-storage name for the persisted key.
    pub fn with_meta_key(backend: Arc<dyn StorageBackend>, meta_key: impl Into<String>) -> Self {
        Self {
            backend,
            meta_key: meta_key.into(),
            cached: Mutex::new(None),
        }
    }

    /// Obtain a cipher for the durable key, generating and persisting the key
    /// if none exists yet.
    ///
    /// Idempotent: every call yields a cipher over the same key material.
    /// Concurrent first use through one provider is serialized by the cache
    /// lock, so exactly one key is ever created.
    pub async fn obtain(&self) -> Result<ObjectCipher> {
        let mut cached = self.cached.lock().await;
        if let Some(material) = cached.as_ref() {
            return Ok(ObjectCipher::new(material.as_bytes())?);
        }
        let material = self.load_or_create().await?;
        let cipher = ObjectCipher::new(material.as_bytes())?;
        *cached = Some(material);
        Ok(cipher)
    }

    async fn load_or_create(&self) -> Result<KeyMaterial> {
        match self.backend.get_meta(&self.meta_key).await {
            Ok(Some(serialized)) => {
                let key: SerializedKey = serde_json::from_str(&serialized).map_err(|e| {
                    CryptoError::KeyUnavailable(format!("persisted key is malformed: {e}"))
                })?;
                Ok(KeyMaterial::from_serialized(&key)?)
            }
            Ok(None) => {
                let material = KeyMaterial::generate()
                    .map_err(|e| CryptoError::KeyUnavailable(e.to_string()))?;
                let serialized = serde_json::to_string(&material.to_serialized())
                    .map_err(|e| CryptoError::KeyUnavailable(e.to_string()))?;
                self.backend
                    .set_meta(&self.meta_key, &serialized)
                    .await
                    .map_err(|e| {
                        CryptoError::KeyUnavailable(format!("key persistence failed: {e}"))
                    })?;
                debug!(meta_key = %self.meta_key, "generated new encryption key");
                Ok(material)
            }
            Err(e) => Err(CryptoError::KeyUnavailable(format!("key storage unavailable: {e}")).into()),
        }
    }
}
