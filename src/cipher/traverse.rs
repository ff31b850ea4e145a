//! Structural recursion over JSON-shaped values.
//!
//! String leaves are encrypted/decrypted; arrays keep their order and length,
//! objects keep their key set and key order; null/bool/number leaves pass
//! through untouched. Decryption is total: a leaf that fails to decode or
//! authenticate is substituted with its original value so that mixed
//! plaintext/ciphertext payloads survive.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CryptoError;

use super::aes_gcm::ObjectCipher;

/// Maximum nesting depth for value traversal.
pub const MAX_DEPTH: usize = 100;

impl ObjectCipher {
    /// Encrypt every string leaf of a JSON-shaped value.
    ///
    /// The structural shape of the input is preserved exactly; only string
    /// leaves change value. Nesting beyond [`MAX_DEPTH`] is rejected.
    pub fn encrypt_value(&self, value: &Value) -> Result<Value, CryptoError> {
        self.encrypt_value_inner(value, 0)
    }

    fn encrypt_value_inner(&self, value: &Value, depth: usize) -> Result<Value, CryptoError> {
        if depth > MAX_DEPTH {
            return Err(CryptoError::DepthExceeded(MAX_DEPTH));
        }
        match value {
            Value::String(s) => Ok(Value::String(self.encrypt_str(s)?)),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.encrypt_value_inner(item, depth + 1)?);
                }
                Ok(Value::Array(out))
            }
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, item) in map {
                    out.insert(key.clone(), self.encrypt_value_inner(item, depth + 1)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }

    /// Decrypt every string leaf of a JSON-shaped value.
    ///
    /// Failures are handled independently per leaf: an undecryptable leaf is
    /// returned unchanged and its siblings still decrypt. Subtrees nested
    /// beyond [`MAX_DEPTH`] also pass through unchanged.
    pub fn decrypt_value(&self, value: &Value) -> Value {
        self.decrypt_value_inner(value, 0)
    }

    fn decrypt_value_inner(&self, value: &Value, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            return value.clone();
        }
        match value {
            Value::String(s) => match self.decrypt_str(s) {
                Ok(plain) => Value::String(plain),
                Err(err) => {
                    debug!(error = %err, "leaving undecryptable leaf unchanged");
                    value.clone()
                }
            },
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.decrypt_value_inner(item, depth + 1))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.decrypt_value_inner(item, depth + 1)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}
