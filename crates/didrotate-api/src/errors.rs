//! Error type and conversions.
use didrotate_core::{key_manager::KeyManagerError, provider::SigningError};
use thiserror::Error;

/// DID rotation API error type.
#[derive(Error, Debug)]
pub enum DIDRotationAPIError {
    #[error("Signing error: {0}")]
    SigningError(SigningError),
    #[error("Key manager error: {0}")]
    KeyManagerError(KeyManagerError),
    #[error("JSON Deserialization Error: {0}.")]
    FailedToDeserialize(#[from] serde_json::Error),
    #[error("JSON Serialization Error: {0}.")]
    FailedToSerialize(serde_json::Error),
    #[error("Failed to read file. Error: {0}")]
    FileReadError(String),
    #[error("Failed to write file. Error: {0}")]
    FileWriteError(String),
}

impl From<SigningError> for DIDRotationAPIError {
    fn from(err: SigningError) -> Self {
        DIDRotationAPIError::SigningError(err)
    }
}

impl From<KeyManagerError> for DIDRotationAPIError {
    fn from(err: KeyManagerError) -> Self {
        DIDRotationAPIError::KeyManagerError(err)
    }
}
