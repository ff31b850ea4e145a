//! Durable key material and its serialized form.
//!
//! The key is persisted as a JWK symmetric key
//! (`{"kty":"oct","k":"<base64url>","alg":"A256GCM"}`), the shape earlier
//! deployments exported, so previously persisted keys import unchanged.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::types::AES_KEY_LENGTH;

const JWK_KEY_TYPE: &str = "oct";
const JWK_ALGORITHM: &str = "A256GCM";

/// Raw 256-bit symmetric key material, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: [u8; AES_KEY_LENGTH],
}

impl KeyMaterial {
    /// Generate fresh random key material.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; AES_KEY_LENGTH];
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Export to the persisted JWK form.
    pub fn to_serialized(&self) -> SerializedKey {
        SerializedKey {
            kty: JWK_KEY_TYPE.to_string(),
            k: URL_SAFE_NO_PAD.encode(self.bytes),
            alg: Some(JWK_ALGORITHM.to_string()),
        }
    }

    /// Import from the persisted JWK form.
    pub fn from_serialized(key: &SerializedKey) -> Result<Self, CryptoError> {
        if key.kty != JWK_KEY_TYPE {
            return Err(CryptoError::KeyUnavailable(format!(
                "unsupported key type \"{}\"",
                key.kty
            )));
        }
        let raw = URL_SAFE_NO_PAD
            .decode(&key.k)
            .map_err(|e| CryptoError::KeyUnavailable(format!("key material decode: {e}")))?;
        let bytes: [u8; AES_KEY_LENGTH] =
            raw.try_into().map_err(|raw: Vec<u8>| CryptoError::KeyUnavailable(format!(
                "key material is {} bytes, expected {}",
                raw.len(),
                AES_KEY_LENGTH
            )))?;
        Ok(Self { bytes })
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}

/// JWK form of the symmetric key, as stored in backend meta storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedKey {
    pub kty: String,
    pub k: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}
