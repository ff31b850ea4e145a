pub mod material;
pub mod provider;

pub use material::{KeyMaterial, SerializedKey};
pub use provider::KeyProvider;
