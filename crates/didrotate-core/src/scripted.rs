//! A deterministic in-memory signing provider for tests and offline use.
//!
//! Proofs are SHA-256 digests over the JCS canonical form of the document (without its proof)
//! followed by the signing key. Verification recomputes the digest with the key registered for
//! the DID named by the proof's verification method. The scheme offers no security: any party
//! knowing the registered key can forge a proof.
use crate::provider::{
    ProofOptions, ProofPurpose, SigningError, SigningKey, SigningProvider, VerificationResult,
};
use crate::utils::{canonicalize, sha256_hex};
use crate::VERIFIABLE_PRESENTATION_TYPE;
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Proof type embedded by the scripted provider.
pub const SCRIPTED_PROOF_TYPE: &str = "ScriptedDigest2023";

/// Proof format supported by the scripted provider.
pub const LDP_PROOF_FORMAT: &str = "ldp";

const PROOF: &str = "proof";

/// Signing provider with a fixed registry of DIDs and their keys.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    keys: HashMap<String, SigningKey>,
    warnings: HashMap<String, Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` as the key controlling `did`.
    pub fn with_key(mut self, did: &str, key: &str) -> Self {
        self.keys.insert(did.to_owned(), SigningKey::new(key));
        self
    }

    /// Reports `warning` for every proof made on behalf of `did`, e.g. to emulate a key that
    /// resolves only from a stale cache.
    pub fn with_warning(mut self, did: &str, warning: &str) -> Self {
        self.warnings
            .entry(did.to_owned())
            .or_default()
            .push(warning.to_owned());
        self
    }
}

/// The DID expected to sign a document: the issuer of a credential or the holder of a
/// presentation.
fn signer(document: &Map<String, Value>) -> Option<&str> {
    match document.get("issuer") {
        Some(Value::String(issuer)) => Some(issuer),
        Some(Value::Object(issuer)) => issuer.get("id").and_then(Value::as_str),
        _ => document.get("holder").and_then(Value::as_str),
    }
}

fn is_presentation(document: &Map<String, Value>) -> bool {
    match document.get("type") {
        Some(Value::String(type_)) => type_ == VERIFIABLE_PRESENTATION_TYPE,
        Some(Value::Array(types)) => types
            .iter()
            .any(|type_| type_.as_str() == Some(VERIFIABLE_PRESENTATION_TYPE)),
        _ => false,
    }
}

fn default_purpose(document: &Map<String, Value>) -> ProofPurpose {
    if is_presentation(document) {
        ProofPurpose::Authentication
    } else {
        ProofPurpose::AssertionMethod
    }
}

fn proof_value(unsigned: &Map<String, Value>, key: &SigningKey) -> Result<String, serde_json::Error> {
    let mut data = canonicalize(unsigned)?;
    data.push('.');
    data.push_str(key.as_str());
    Ok(sha256_hex(data.as_bytes()))
}

/// The DID a verification method URL belongs to.
fn controller(verification_method: &str) -> &str {
    verification_method
        .split('#')
        .next()
        .unwrap_or(verification_method)
}

#[async_trait]
impl SigningProvider for ScriptedProvider {
    async fn sign(
        &self,
        document: &Value,
        options: &ProofOptions,
        key: &SigningKey,
    ) -> Result<Value, SigningError> {
        if let Some(format) = options.proof_format.as_deref() {
            if format != LDP_PROOF_FORMAT {
                return Err(SigningError::UnsupportedProofFormat(format.to_owned()));
            }
        }
        let mut unsigned = document
            .as_object()
            .cloned()
            .ok_or_else(|| SigningError::InvalidDocument("expected a JSON object".to_owned()))?;
        unsigned.remove(PROOF);
        let signer = signer(&unsigned)
            .ok_or_else(|| SigningError::InvalidDocument("no issuer or holder".to_owned()))?
            .to_owned();
        if !signer.starts_with("did:") {
            return Err(SigningError::UnsupportedDIDMethod(signer));
        }
        match self.keys.get(&signer) {
            Some(registered) if registered == key => (),
            _ => return Err(SigningError::UnresolvableKey(signer)),
        }
        let purpose = options
            .proof_purpose
            .unwrap_or_else(|| default_purpose(&unsigned));
        let verification_method = options
            .verification_method
            .clone()
            .unwrap_or_else(|| format!("{}#key-1", signer));
        let value = proof_value(&unsigned, key)
            .map_err(|err| SigningError::FailedToGenerateProof(err.to_string()))?;
        debug!("Signed document for {} with purpose {}", signer, purpose);
        unsigned.insert(
            PROOF.to_owned(),
            json!({
                "type": SCRIPTED_PROOF_TYPE,
                "proofPurpose": purpose,
                "verificationMethod": verification_method,
                "proofValue": value
            }),
        );
        Ok(Value::Object(unsigned))
    }

    async fn verify(&self, document: &Value, options: &ProofOptions) -> VerificationResult {
        let Some(mut unsigned) = document.as_object().cloned() else {
            return VerificationResult::from_error("Document is not a JSON object");
        };
        let Some(proof) = unsigned.remove(PROOF) else {
            return VerificationResult::from_error("No applicable proof");
        };
        let purpose = proof.get("proofPurpose").and_then(Value::as_str);
        if let Some(expected) = options.proof_purpose {
            if purpose != Some(expected.to_string().as_str()) {
                return VerificationResult::from_error(format!(
                    "Proof purpose mismatch: expected {}",
                    expected
                ));
            }
        }
        let Some(verification_method) = proof.get("verificationMethod").and_then(Value::as_str)
        else {
            return VerificationResult::from_error("Missing verification method");
        };
        let did = controller(verification_method);
        if signer(&unsigned) != Some(did) {
            return VerificationResult::from_error(format!(
                "Verification method {} does not belong to the signer",
                verification_method
            ));
        }
        let Some(key) = self.keys.get(did) else {
            return VerificationResult::from_error(format!(
                "Unable to resolve verification method: {}",
                verification_method
            ));
        };
        let expected = match proof_value(&unsigned, key) {
            Ok(value) => value,
            Err(err) => return VerificationResult::from_error(err.to_string()),
        };
        if proof.get("proofValue").and_then(Value::as_str) != Some(expected.as_str()) {
            return VerificationResult::from_error("signature error");
        }
        VerificationResult {
            errors: Vec::new(),
            warnings: self.warnings.get(did).cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TEST_DID_A, TEST_DID_B, TEST_KEY_A, TEST_KEY_B, TEST_UNSIGNED_ROTATION_VC};

    fn provider() -> ScriptedProvider {
        ScriptedProvider::new()
            .with_key(TEST_DID_A, TEST_KEY_A)
            .with_key(TEST_DID_B, TEST_KEY_B)
    }

    fn unsigned_vc() -> Value {
        serde_json::from_str(TEST_UNSIGNED_ROTATION_VC).unwrap()
    }

    #[tokio::test]
    async fn test_sign_and_verify() {
        let provider = provider();
        let signed = provider
            .sign(&unsigned_vc(), &ProofOptions::default(), &TEST_KEY_A.into())
            .await
            .unwrap();
        assert_eq!(signed["proof"]["type"], json!(SCRIPTED_PROOF_TYPE));
        assert_eq!(signed["proof"]["proofPurpose"], json!("assertionMethod"));
        assert_eq!(
            signed["proof"]["verificationMethod"],
            json!(format!("{}#key-1", TEST_DID_A))
        );
        assert!(provider
            .verify(&signed, &ProofOptions::default())
            .await
            .is_empty());
        assert!(provider
            .verify(
                &signed,
                &ProofOptions::with_purpose(ProofPurpose::AssertionMethod)
            )
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_sign_errors() {
        let provider = provider();
        assert_eq!(
            provider
                .sign(&unsigned_vc(), &ProofOptions::default(), &TEST_KEY_B.into())
                .await,
            Err(SigningError::UnresolvableKey(TEST_DID_A.to_string()))
        );
        let options = ProofOptions {
            proof_format: Some("jwt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            provider
                .sign(&unsigned_vc(), &options, &TEST_KEY_A.into())
                .await,
            Err(SigningError::UnsupportedProofFormat("jwt".to_string()))
        );
        let mut not_a_did = unsigned_vc();
        not_a_did["issuer"] = json!("https://example.com/issuer");
        assert!(matches!(
            provider
                .sign(&not_a_did, &ProofOptions::default(), &TEST_KEY_A.into())
                .await,
            Err(SigningError::UnsupportedDIDMethod(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_tampered() {
        let provider = provider();
        let mut signed = provider
            .sign(&unsigned_vc(), &ProofOptions::default(), &TEST_KEY_A.into())
            .await
            .unwrap();
        signed["credentialSubject"]["sameControllerAs"] = json!(TEST_DID_B);
        assert_eq!(
            provider.verify(&signed, &ProofOptions::default()).await,
            VerificationResult::from_error("signature error")
        );
    }

    #[tokio::test]
    async fn test_verify_unsigned_and_wrong_purpose() {
        let provider = provider();
        assert_eq!(
            provider
                .verify(&unsigned_vc(), &ProofOptions::default())
                .await,
            VerificationResult::from_error("No applicable proof")
        );
        let signed = provider
            .sign(&unsigned_vc(), &ProofOptions::default(), &TEST_KEY_A.into())
            .await
            .unwrap();
        let result = provider
            .verify(
                &signed,
                &ProofOptions::with_purpose(ProofPurpose::Authentication),
            )
            .await;
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_verify_with_scripted_warning() {
        let provider = provider().with_warning(TEST_DID_A, "key resolved from cache");
        let signed = provider
            .sign(&unsigned_vc(), &ProofOptions::default(), &TEST_KEY_A.into())
            .await
            .unwrap();
        let result = provider.verify(&signed, &ProofOptions::default()).await;
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings, vec!["key resolved from cache"]);
    }
}
