//! Signing provider backed by `ssi` linked data proofs.
use async_trait::async_trait;
use did_method_key::DIDKey;
use didrotate_core::provider::{
    ProofOptions, ProofPurpose, SigningError, SigningKey, SigningProvider, VerificationResult,
};
use didrotate_core::VERIFIABLE_PRESENTATION_TYPE;
use lazy_static::lazy_static;
use log::debug;
use serde_json::Value;
use ssi::did::{DIDMethod, DIDMethods, Source};
use ssi::jsonld::ContextLoader;
use ssi::jwk::JWK;
use ssi::vc::{Credential, LinkedDataProofOptions, Presentation, URI};

/// The only proof format produced by this provider.
pub const LDP_PROOF_FORMAT: &str = "ldp";

const DID_KEY_PREFIX: &str = "did:key:";

lazy_static! {
    /// Static reference to the DID methods supported by default.
    pub static ref DID_METHODS: DIDMethods<'static> = {
        let mut methods = DIDMethods::default();
        methods.insert(&DIDKey);
        methods
    };
}

/// Signing provider creating and verifying linked data proofs with `ssi`. Keys are JWKs
/// serialized as JSON.
pub struct SSIProvider<'a> {
    methods: &'a DIDMethods<'a>,
}

impl<'a> SSIProvider<'a> {
    /// Provider resolving DIDs with the given methods.
    pub fn new(methods: &'a DIDMethods<'a>) -> Self {
        Self { methods }
    }
}

impl Default for SSIProvider<'static> {
    fn default() -> Self {
        Self::new(&DID_METHODS)
    }
}

fn is_presentation(document: &Value) -> bool {
    match document.get("type") {
        Some(Value::String(type_)) => type_ == VERIFIABLE_PRESENTATION_TYPE,
        Some(Value::Array(types)) => types
            .iter()
            .any(|type_| type_.as_str() == Some(VERIFIABLE_PRESENTATION_TYPE)),
        _ => false,
    }
}

/// The issuer of a credential or the holder of a presentation.
fn signer(document: &Value) -> Option<&str> {
    match document.get("issuer") {
        Some(Value::String(issuer)) => Some(issuer),
        Some(Value::Object(issuer)) => issuer.get("id").and_then(Value::as_str),
        _ => document.get("holder").and_then(Value::as_str),
    }
}

fn ldp_purpose(document: &Value, purpose: Option<ProofPurpose>) -> ssi::vc::ProofPurpose {
    let default = if is_presentation(document) {
        ProofPurpose::Authentication
    } else {
        ProofPurpose::AssertionMethod
    };
    match purpose.unwrap_or(default) {
        ProofPurpose::AssertionMethod => ssi::vc::ProofPurpose::AssertionMethod,
        ProofPurpose::Authentication => ssi::vc::ProofPurpose::Authentication,
    }
}

/// Verification method of a `did:key` DID: the DID URL with the key's multibase fragment.
fn did_key_verification_method(did: &str) -> Option<String> {
    did.strip_prefix(DID_KEY_PREFIX)
        .map(|fragment| format!("{}#{}", did, fragment))
}

impl SSIProvider<'_> {
    /// Checks the DID method is supported and, where the DID is derived from its key, that the
    /// key controls the DID.
    fn check_signer(&self, signer: &str, jwk: &JWK) -> Result<(), SigningError> {
        let method = self
            .methods
            .get_method(signer)
            .map_err(|_| SigningError::UnsupportedDIDMethod(signer.to_owned()))?;
        if signer.starts_with(DID_KEY_PREFIX)
            && method.generate(&Source::Key(jwk)).as_deref() != Some(signer)
        {
            return Err(SigningError::UnresolvableKey(signer.to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl SigningProvider for SSIProvider<'_> {
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
        let jwk: JWK = serde_json::from_str(key.as_str())
            .map_err(|err| SigningError::InvalidKey(err.to_string()))?;
        let signer = signer(document)
            .ok_or_else(|| SigningError::InvalidDocument("no issuer or holder".to_owned()))?;
        self.check_signer(signer, &jwk)?;

        let verification_method = options
            .verification_method
            .clone()
            .or_else(|| did_key_verification_method(signer));
        let ldp_options = LinkedDataProofOptions {
            proof_purpose: Some(ldp_purpose(document, options.proof_purpose)),
            verification_method: verification_method.map(URI::String),
            ..Default::default()
        };
        let resolver = self.methods.to_resolver();
        let mut context_loader = ContextLoader::default();

        let signed = if is_presentation(document) {
            let mut presentation: Presentation = serde_json::from_value(document.clone())
                .map_err(|err| SigningError::InvalidDocument(err.to_string()))?;
            let proof = presentation
                .generate_proof(&jwk, &ldp_options, resolver, &mut context_loader)
                .await
                .map_err(|err| SigningError::FailedToGenerateProof(err.to_string()))?;
            presentation.add_proof(proof);
            serde_json::to_value(presentation)
        } else {
            let mut credential: Credential = serde_json::from_value(document.clone())
                .map_err(|err| SigningError::InvalidDocument(err.to_string()))?;
            let proof = credential
                .generate_proof(&jwk, &ldp_options, resolver, &mut context_loader)
                .await
                .map_err(|err| SigningError::FailedToGenerateProof(err.to_string()))?;
            credential.add_proof(proof);
            serde_json::to_value(credential)
        };
        debug!("Generated linked data proof for {}", signer);
        signed.map_err(|err| SigningError::FailedToGenerateProof(err.to_string()))
    }

    async fn verify(&self, document: &Value, options: &ProofOptions) -> VerificationResult {
        let ldp_options = LinkedDataProofOptions {
            proof_purpose: Some(ldp_purpose(document, options.proof_purpose)),
            verification_method: options.verification_method.clone().map(URI::String),
            ..Default::default()
        };
        let resolver = self.methods.to_resolver();
        let mut context_loader = ContextLoader::default();
        let result = if is_presentation(document) {
            match serde_json::from_value::<Presentation>(document.clone()) {
                Ok(presentation) => {
                    presentation
                        .verify(Some(ldp_options), resolver, &mut context_loader)
                        .await
                }
                Err(err) => return VerificationResult::from_error(err.to_string()),
            }
        } else {
            match serde_json::from_value::<Credential>(document.clone()) {
                Ok(credential) => {
                    credential
                        .verify(Some(ldp_options), resolver, &mut context_loader)
                        .await
                }
                Err(err) => return VerificationResult::from_error(err.to_string()),
            }
        };
        VerificationResult {
            errors: result.errors,
            warnings: result.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didrotate_core::attestor::RotationAttestor;
    use didrotate_core::holder::Holder;
    use didrotate_core::issuer::Issuer;
    use didrotate_core::utils::SystemClock;
    use didrotate_core::verifier::{RotationVerifier, Verifier};
    use didrotate_core::vp::PresentationError;
    use serde_json::json;

    fn generate_key() -> (String, SigningKey) {
        let jwk = JWK::generate_secp256k1().unwrap();
        let did = DIDKey.generate(&Source::Key(&jwk)).unwrap();
        (did, SigningKey::new(serde_json::to_string(&jwk).unwrap()))
    }

    fn unsigned_credential(issuer: &str, subject: &str) -> Value {
        json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "issuer": issuer,
            "issuanceDate": "2023-05-01T12:00:00Z",
            "credentialSubject": {"id": subject}
        })
    }

    #[test]
    fn test_did_key_verification_method() {
        let did = "did:key:zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme";
        assert_eq!(
            did_key_verification_method(did),
            Some(format!(
                "{}#zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme",
                did
            ))
        );
        assert_eq!(did_key_verification_method("did:example:A"), None);
    }

    #[test]
    fn test_ldp_purpose_defaults() {
        let credential = unsigned_credential("did:example:A", "did:example:B");
        assert_eq!(
            ldp_purpose(&credential, None),
            ssi::vc::ProofPurpose::AssertionMethod
        );
        let presentation = json!({"type": "VerifiablePresentation"});
        assert_eq!(
            ldp_purpose(&presentation, None),
            ssi::vc::ProofPurpose::Authentication
        );
        assert_eq!(
            ldp_purpose(&presentation, Some(ProofPurpose::AssertionMethod)),
            ssi::vc::ProofPurpose::AssertionMethod
        );
    }

    #[tokio::test]
    async fn test_sign_errors() {
        let provider = SSIProvider::default();
        let (did, key) = generate_key();
        let (other_did, _) = generate_key();

        let result = provider
            .sign(
                &unsigned_credential("did:example:A", &did),
                &ProofOptions::default(),
                &key,
            )
            .await;
        assert_eq!(
            result,
            Err(SigningError::UnsupportedDIDMethod("did:example:A".to_string()))
        );

        let result = provider
            .sign(
                &unsigned_credential(&other_did, &did),
                &ProofOptions::default(),
                &key,
            )
            .await;
        assert_eq!(result, Err(SigningError::UnresolvableKey(other_did)));

        let result = provider
            .sign(
                &unsigned_credential(&did, &did),
                &ProofOptions::default(),
                &SigningKey::new("not a jwk"),
            )
            .await;
        assert!(matches!(result, Err(SigningError::InvalidKey(_))));

        let options = ProofOptions {
            proof_format: Some("jwt".to_string()),
            ..Default::default()
        };
        let result = provider
            .sign(&unsigned_credential(&did, &did), &options, &key)
            .await;
        assert_eq!(
            result,
            Err(SigningError::UnsupportedProofFormat("jwt".to_string()))
        );
    }

    #[tokio::test]
    async fn test_verify_unsigned_credential() {
        let provider = SSIProvider::default();
        let (did, _) = generate_key();
        let result = provider
            .verify(&unsigned_credential(&did, &did), &ProofOptions::default())
            .await;
        assert!(!result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_rotation_round_trip_did_key() {
        let provider = SSIProvider::default();
        let (did_a, key_a) = generate_key();
        let (did_b, key_b) = generate_key();
        let a = RotationAttestor::new(&did_a, key_a);
        let b = RotationAttestor::new(&did_b, key_b);

        let vc_ab = a
            .issue_rotation_credential(&did_b, &provider, &SystemClock)
            .await
            .unwrap();
        let vc_ba = b
            .issue_rotation_credential(&did_a, &provider, &SystemClock)
            .await
            .unwrap();
        assert!(provider
            .verify(&vc_ab, &ProofOptions::default())
            .await
            .errors
            .is_empty());

        let vp = a.issue_presentation(&vc_ab, &vc_ba, &provider).await.unwrap();
        let verifier = RotationVerifier::new(&provider);
        assert_eq!(verifier.verify(&vp).await, Ok(()));

        let mut tampered = vp.clone();
        tampered["verifiableCredential"][1]["credentialSubject"]["sameControllerAs"] =
            json!(did_a);
        assert!(matches!(
            verifier.verify(&tampered).await,
            Err(PresentationError::InvalidCredential(1, _))
        ));
    }
}
