//! Signing provider API: the capability that embeds and checks proofs on documents.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// An error relating to proof generation by a signing provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The signer's DID method is not supported by the provider.
    #[error("Unsupported DID method for DID: {0}.")]
    UnsupportedDIDMethod(String),
    /// The key cannot be used to sign on behalf of the DID.
    #[error("Key cannot be resolved for DID: {0}.")]
    UnresolvableKey(String),
    /// The key material could not be parsed by the provider.
    #[error("Invalid key material: {0}")]
    InvalidKey(String),
    /// The requested proof format is not supported.
    #[error("Unsupported proof format: {0}.")]
    UnsupportedProofFormat(String),
    /// The document could not be interpreted for signing.
    #[error("Invalid document for signing: {0}")]
    InvalidDocument(String),
    /// The provider failed to generate a proof.
    #[error("Failed to generate proof: {0}")]
    FailedToGenerateProof(String),
}

/// Opaque key material handed to a signing provider.
///
/// The core never parses the key; its format is a contract between the key source and the
/// provider (e.g. a JWK JSON string).
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

impl From<&str> for SigningKey {
    fn from(key: &str) -> Self {
        SigningKey::new(key)
    }
}

/// Verification relationship a proof is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    AssertionMethod,
    Authentication,
}

impl fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => f.write_str("assertionMethod"),
            ProofPurpose::Authentication => f.write_str("authentication"),
        }
    }
}

/// Options passed to a signing provider. Unset fields are chosen by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<ProofPurpose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_format: Option<String>,
}

impl ProofOptions {
    /// Options constraining only the proof purpose.
    pub fn with_purpose(proof_purpose: ProofPurpose) -> Self {
        Self {
            proof_purpose: Some(proof_purpose),
            ..Default::default()
        }
    }
}

/// Errors and warnings reported by a verification. Both empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl VerificationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }

    /// True when there are neither errors nor warnings.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// A signing provider creates and checks proofs on JSON documents (credentials and
/// presentations).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SigningProvider: Send + Sync {
    /// Returns `document` with an embedded proof created with `key`.
    async fn sign(
        &self,
        document: &Value,
        options: &ProofOptions,
        key: &SigningKey,
    ) -> Result<Value, SigningError>;

    /// Verifies the proof embedded in `document`. Failures are reported in the result, never
    /// raised.
    async fn verify(&self, document: &Value, options: &ProofOptions) -> VerificationResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proof_options_serialize() {
        let options = ProofOptions::with_purpose(ProofPurpose::AssertionMethod);
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"proofPurpose":"assertionMethod"}"#
        );
        assert_eq!(serde_json::to_string(&ProofOptions::default()).unwrap(), "{}");
    }

    #[test]
    fn test_signing_key_debug_redacted() {
        let key = SigningKey::new("secret-key-material");
        assert_eq!(format!("{:?}", key), "SigningKey(..)");
        assert_eq!(key.as_str(), "secret-key-material");
    }

    #[test]
    fn test_verification_result_is_empty() {
        assert!(VerificationResult::new().is_empty());
        assert!(!VerificationResult::from_error("signature error").is_empty());
        let warned = VerificationResult {
            errors: vec![],
            warnings: vec!["created in the future".to_string()],
        };
        assert!(!warned.is_empty());
    }
}
