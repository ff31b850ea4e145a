//! Transport-safe envelope encoding.
//!
//! One envelope per encrypted string leaf: base64([IV:12][ciphertext+tag]).
//! There is no version byte; earlier producers wrote this exact frame and
//! their envelopes must still decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CryptoError;
use crate::types::{AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH};

/// Encode IV || ciphertext+tag as a transport-safe string.
pub fn encode(iv: &[u8; AES_GCM_IV_LENGTH], ciphertext: &[u8]) -> String {
    let mut raw = Vec::with_capacity(AES_GCM_IV_LENGTH + ciphertext.len());
    raw.extend_from_slice(iv);
    raw.extend_from_slice(ciphertext);
    STANDARD.encode(raw)
}

/// Decode an envelope string, splitting the IV from the ciphertext+tag.
pub fn decode(envelope: &str) -> Result<([u8; AES_GCM_IV_LENGTH], Vec<u8>), CryptoError> {
    let raw = STANDARD
        .decode(envelope)
        .map_err(|e| CryptoError::DecodeFailure(e.to_string()))?;
    if raw.len() < AES_GCM_IV_LENGTH + AES_GCM_TAG_LENGTH {
        return Err(CryptoError::DecodeFailure(format!(
            "envelope too short: {} bytes",
            raw.len()
        )));
    }
    let mut iv = [0u8; AES_GCM_IV_LENGTH];
    iv.copy_from_slice(&raw[..AES_GCM_IV_LENGTH]);
    Ok((iv, raw[AES_GCM_IV_LENGTH..].to_vec()))
}
