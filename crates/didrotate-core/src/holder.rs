//! DID holder API.
use crate::provider::{ProofOptions, SigningError, SigningProvider};
use crate::subject::Subject;
use crate::vp::RotationPresentation;
use async_trait::async_trait;
use log::info;
use serde_json::Value;

/// A holder signs a presentation to generate a verifiable presentation.
#[async_trait]
pub trait Holder: Subject + Send + Sync {
    /// Wraps the two credentials, verbatim and in the given order, into a presentation signed by
    /// this holder.
    ///
    /// No check is made that the credentials are valid or mutually consistent: any pair is
    /// accepted and rejection is left to the verifier.
    async fn issue_presentation(
        &self,
        credential_a: &Value,
        credential_b: &Value,
        provider: &dyn SigningProvider,
    ) -> Result<Value, SigningError> {
        self.issue_presentation_with(credential_a, credential_b, &ProofOptions::default(), provider)
            .await
    }

    /// As [`Holder::issue_presentation`], passing `options` to the provider.
    async fn issue_presentation_with(
        &self,
        credential_a: &Value,
        credential_b: &Value,
        options: &ProofOptions,
        provider: &dyn SigningProvider,
    ) -> Result<Value, SigningError> {
        let presentation =
            RotationPresentation::new(self.did(), credential_a.clone(), credential_b.clone());
        let document = presentation
            .to_document()
            .map_err(|err| SigningError::InvalidDocument(err.to_string()))?;
        let signed = provider
            .sign(&document, options, self.signing_key())
            .await?;
        info!("Issued rotation presentation held by: {}", self.did());
        Ok(signed)
    }
}
