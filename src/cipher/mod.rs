pub mod aes_gcm;
pub mod envelope;
pub mod traverse;

pub use aes_gcm::{generate_iv, ObjectCipher};
pub use traverse::MAX_DEPTH;
