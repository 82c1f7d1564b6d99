//! Verification of DID rotation presentations.
//!
//! A presentation is accepted only if every gate below passes. Gates run in order and the
//! first failure is returned:
//!
//! 1. exactly two credentials are embedded;
//! 2. each credential carries a valid proof by its issuer;
//! 3. each credential has the `DIDRotationCredential` type;
//! 4. each credential names its own issuer in `sameControllerAs`;
//! 5. the holder is the issuer or the subject of each credential;
//! 6. the second credential reverses the first;
//! 7. the presentation carries a valid authentication proof by the holder.
//!
//! Each gate checks both credentials (in index order) before the next gate starts. Any
//! warning reported by the signing provider is treated as a failure.
use crate::provider::{ProofOptions, ProofPurpose, SigningProvider, VerificationResult};
use crate::vc::{CredentialError, RotationCredential};
use crate::vp::{verification_result, PresentationError, RotationPresentation};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

/// A verifier of rotation presentations.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Signing provider used to check embedded proofs.
    fn provider(&self) -> &dyn SigningProvider;

    /// Verifies a rotation presentation. Every rejection is reported as an error value.
    async fn verify(&self, document: &Value) -> Result<(), PresentationError> {
        let outcome = self.verify_gates(document).await;
        match &outcome {
            Ok(()) => debug!("Rotation presentation accepted."),
            Err(err) => warn!("Rotation presentation rejected ({}): {}", err.kind(), err),
        }
        outcome
    }

    /// Verifies a rotation presentation, reporting the outcome as a verification result. Both
    /// lists are empty if and only if the presentation is accepted.
    async fn verify_to_result(&self, document: &Value) -> VerificationResult {
        verification_result(&self.verify(document).await)
    }

    /// Runs the gate chain on a presentation document.
    async fn verify_gates(&self, document: &Value) -> Result<(), PresentationError> {
        let presentation = RotationPresentation::from_document(document)?;

        for (index, credential) in presentation.credentials().iter().enumerate() {
            let result = self
                .provider()
                .verify(
                    credential,
                    &ProofOptions::with_purpose(ProofPurpose::AssertionMethod),
                )
                .await;
            if !result.is_empty() {
                return Err(PresentationError::InvalidCredential(
                    index,
                    CredentialError::VerificationResultError(result),
                ));
            }
        }
        debug!("Credential proofs verified.");

        let mut credentials = Vec::with_capacity(presentation.credentials().len());
        for (index, credential) in presentation.credentials().iter().enumerate() {
            let credential = RotationCredential::from_document(credential)
                .and_then(|credential| credential.check_type().map(|_| credential))
                .map_err(|err| PresentationError::InvalidCredential(index, err))?;
            credentials.push(credential);
        }

        for (index, credential) in credentials.iter().enumerate() {
            credential
                .check_same_controller()
                .map_err(|err| PresentationError::InvalidCredential(index, err))?;
        }

        for (index, credential) in credentials.iter().enumerate() {
            if !credential.names(&presentation.holder) {
                return Err(PresentationError::HolderNotParty {
                    holder: presentation.holder.clone(),
                    index,
                });
            }
        }

        let (first, second) = (&credentials[0], &credentials[1]);
        if !second.is_reverse_of(first) {
            return Err(PresentationError::UnpairedRotation {
                first_issuer: first.issuer().to_string(),
                first_subject: first.subject_id().to_string(),
                second_issuer: second.issuer().to_string(),
                second_subject: second.subject_id().to_string(),
            });
        }
        debug!(
            "Credentials pair {} and {} for holder {}.",
            first.issuer(),
            first.subject_id(),
            presentation.holder
        );

        let result = self
            .provider()
            .verify(
                document,
                &ProofOptions::with_purpose(ProofPurpose::Authentication),
            )
            .await;
        if !result.is_empty() {
            return Err(PresentationError::VerifiedHolderUnauthenticated(result));
        }
        Ok(())
    }
}

/// Rotation presentation verifier backed by a signing provider.
pub struct RotationVerifier<'a> {
    provider: &'a dyn SigningProvider,
}

impl<'a> RotationVerifier<'a> {
    pub fn new(provider: &'a dyn SigningProvider) -> Self {
        Self { provider }
    }
}

impl Verifier for RotationVerifier<'_> {
    fn provider(&self) -> &dyn SigningProvider {
        self.provider
    }
}
