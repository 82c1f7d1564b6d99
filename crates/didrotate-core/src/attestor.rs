//! An entity that issues rotation credentials and presents them.
use crate::holder::Holder;
use crate::issuer::Issuer;
use crate::key_manager::{FileKeyManager, KeyManager, KeyManagerError};
use crate::provider::SigningKey;
use crate::subject::Subject;
use std::path::Path;

/// A DID subject with a signing key, acting as issuer and holder of rotation credentials.
#[derive(Debug, Clone)]
pub struct RotationAttestor {
    did: String,
    signing_key: SigningKey,
}

impl RotationAttestor {
    pub fn new(did: &str, signing_key: SigningKey) -> Self {
        Self {
            did: did.to_owned(),
            signing_key,
        }
    }

    /// Constructs an attestor reading its signing key from a file.
    pub fn from_key_file(did: &str, path: &Path) -> Result<Self, KeyManagerError> {
        let signing_key = FileKeyManager.read_key(path)?;
        Ok(Self::new(did, signing_key))
    }
}

impl Subject for RotationAttestor {
    fn did(&self) -> &str {
        &self.did
    }

    fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl Issuer for RotationAttestor {}

impl Holder for RotationAttestor {}
