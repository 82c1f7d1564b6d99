//! DID issuer API.
use crate::provider::{ProofOptions, SigningError, SigningProvider};
use crate::subject::Subject;
use crate::utils::{issuance_date, Clock};
use crate::vc::RotationCredential;
use async_trait::async_trait;
use log::info;
use serde_json::Value;

/// A credential issuer signs a credential to generate a verifiable credential.
#[async_trait]
pub trait Issuer: Subject + Send + Sync {
    /// Issues a signed rotation credential in which this issuer vouches that `subject_did` has
    /// the same controller as the issuer. The issuance date is read from `clock`.
    async fn issue_rotation_credential(
        &self,
        subject_did: &str,
        provider: &dyn SigningProvider,
        clock: &dyn Clock,
    ) -> Result<Value, SigningError> {
        self.issue_rotation_credential_with(subject_did, &ProofOptions::default(), provider, clock)
            .await
    }

    /// As [`Issuer::issue_rotation_credential`], passing `options` to the provider.
    async fn issue_rotation_credential_with(
        &self,
        subject_did: &str,
        options: &ProofOptions,
        provider: &dyn SigningProvider,
        clock: &dyn Clock,
    ) -> Result<Value, SigningError> {
        let credential = RotationCredential::new(self.did(), subject_did, issuance_date(clock));
        let document = credential
            .to_document()
            .map_err(|err| SigningError::InvalidDocument(err.to_string()))?;
        let signed = provider
            .sign(&document, options, self.signing_key())
            .await?;
        info!(
            "Issued rotation credential: {} -> {}",
            self.did(),
            subject_did
        );
        Ok(signed)
    }
}
