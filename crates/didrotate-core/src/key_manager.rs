//! Key management API with default implementations.
use crate::provider::SigningKey;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// An error relating to key management.
#[derive(Error, Debug)]
pub enum KeyManagerError {
    /// Key does not exist.
    #[error("Key does not exist: {0}")]
    FailedToLoadKey(String),
    /// Failed to read UTF-8 data.
    #[error("Failed to read UTF-8 data.")]
    FailedToReadUTF8,
    /// Key file contained no key material.
    #[error("Key is empty.")]
    EmptyKey,
}

pub trait KeyManager {
    /// Reads a signing key from a file.
    fn read_key(&self, path: &Path) -> Result<SigningKey, KeyManagerError> {
        let file = File::open(path)
            .map_err(|_| KeyManagerError::FailedToLoadKey(path.display().to_string()))?;
        self.read_key_from(Box::new(file))
    }

    /// Reads one key from a Reader. Surrounding whitespace is ignored.
    fn read_key_from(&self, mut reader: Box<dyn Read>) -> Result<SigningKey, KeyManagerError> {
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(|_| KeyManagerError::FailedToReadUTF8)?;
        let key = buf.trim();
        if key.is_empty() {
            return Err(KeyManagerError::EmptyKey);
        }
        Ok(SigningKey::new(key))
    }
}

/// Key manager reading keys from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileKeyManager;

impl KeyManager for FileKeyManager {}
