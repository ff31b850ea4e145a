//! AES-256-GCM encryption of string leaves.
//!
//! Envelope wire format: base64([IV:12][ciphertext+tag]).
//! A fresh random IV is generated per encryption call, so envelopes are
//! never deterministic.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::CryptoError;
use crate::types::{AES_GCM_IV_LENGTH, AES_KEY_LENGTH};

use super::envelope;

/// Generate a random 12-byte IV for AES-GCM.
pub fn generate_iv() -> Result<[u8; AES_GCM_IV_LENGTH], CryptoError> {
    let mut iv = [0u8; AES_GCM_IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Leaf-level symmetric cipher over the application's durable key.
///
/// Scalar operations live here; the structural recursion over composite
/// values is in [`super::traverse`].
pub struct ObjectCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for ObjectCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCipher").finish_non_exhaustive()
    }
}

impl ObjectCipher {
    /// Build a cipher from 32-byte (256-bit) raw key material.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != AES_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: AES_KEY_LENGTH,
                got: key.len(),
            });
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CryptoError::EncryptFailure(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypt a text value into an envelope string.
    pub fn encrypt_str(&self, plaintext: &str) -> Result<String, CryptoError> {
        let iv = generate_iv()?;
        let nonce = Nonce::from_slice(&iv);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::EncryptFailure(e.to_string()))?;
        Ok(envelope::encode(&iv, &ciphertext))
    }

    /// Decrypt an envelope string back to the original text value.
    pub fn decrypt_str(&self, envelope_str: &str) -> Result<String, CryptoError> {
        let (iv, ciphertext) = envelope::decode(envelope_str)?;
        let nonce = Nonce::from_slice(&iv);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext.as_slice())
            .map_err(|e| CryptoError::DecryptFailure(e.to_string()))?;
        String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        getrandom::getrandom(&mut key).unwrap();
        key
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        let encrypted = cipher.encrypt_str("Hello, World!").unwrap();
        assert_eq!(cipher.decrypt_str(&encrypted).unwrap(), "Hello, World!");
    }

    #[test]
    fn different_envelope_each_time() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        let enc1 = cipher.encrypt_str("test").unwrap();
        let enc2 = cipher.encrypt_str("test").unwrap();
        assert_ne!(enc1, enc2);
        assert_eq!(cipher.decrypt_str(&enc1).unwrap(), "test");
        assert_eq!(cipher.decrypt_str(&enc2).unwrap(), "test");
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        let encrypted = cipher.encrypt_str("secret").unwrap();
        let (iv, mut ct) = envelope::decode(&encrypted).unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xff;
        let tampered = envelope::encode(&iv, &ct);
        assert!(matches!(
            cipher.decrypt_str(&tampered),
            Err(CryptoError::DecryptFailure(_))
        ));
    }

    #[test]
    fn wrong_key_fails() {
        let cipher1 = ObjectCipher::new(&random_key()).unwrap();
        let cipher2 = ObjectCipher::new(&random_key()).unwrap();
        let encrypted = cipher1.encrypt_str("secret").unwrap();
        assert!(cipher2.decrypt_str(&encrypted).is_err());
    }

    #[test]
    fn rejects_plain_text_input() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        assert!(cipher.decrypt_str("not-a-valid-envelope").is_err());
    }

    #[test]
    fn rejects_wrong_key_length() {
        assert!(matches!(
            ObjectCipher::new(&[0u8; 16]),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                got: 16
            })
        ));
    }

    #[test]
    fn handles_empty_string() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        let encrypted = cipher.encrypt_str("").unwrap();
        assert_eq!(cipher.decrypt_str(&encrypted).unwrap(), "");
    }

    #[test]
    fn handles_unicode() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        let text = "Besprächstermin 打电话 📞";
        let encrypted = cipher.encrypt_str(text).unwrap();
        assert_eq!(cipher.decrypt_str(&encrypted).unwrap(), text);
    }

    #[test]
    fn handles_large_input() {
        let cipher = ObjectCipher::new(&random_key()).unwrap();
        let text = "x".repeat(100 * 1024);
        let encrypted = cipher.encrypt_str(&text).unwrap();
        assert_eq!(cipher.decrypt_str(&encrypted).unwrap(), text);
    }

    #[test]
    fn iv_is_random() {
        let iv1 = generate_iv().unwrap();
        let iv2 = generate_iv().unwrap();
        assert_ne!(iv1, iv2);
    }
}
