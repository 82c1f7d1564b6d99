//! DID subject API.
use crate::provider::SigningKey;

/// Trait for common DID subject functionality.
pub trait Subject {
    /// Returns the subject's DID as a string slice.
    fn did(&self) -> &str;

    /// Returns the key the subject signs with.
    fn signing_key(&self) -> &SigningKey;
}
