use crate::errors::DIDRotationAPIError;
use async_trait::async_trait;
use didrotate_core::{
    attestor::RotationAttestor,
    holder::Holder,
    issuer::Issuer,
    provider::{ProofOptions, SigningProvider},
    subject::Subject,
    utils::Clock,
    verifier::{RotationVerifier, Verifier},
    vp::PresentationError,
    ROTATION_PAIR_LEN,
};
use futures::{stream, StreamExt};
use log::info;
use serde_json::Value;
use std::path::Path;

/// API for DID rotation credential functionality.
#[async_trait]
pub trait DIDRotationVCAPI {
    /// Issues a rotation credential in which `issuer` vouches that `subject_did` shares its
    /// controller.
    async fn issue_rotation_credential(
        issuer: &RotationAttestor,
        subject_did: &str,
        options: &ProofOptions,
        provider: &dyn SigningProvider,
        clock: &dyn Clock,
    ) -> Result<Value, DIDRotationAPIError> {
        Ok(issuer
            .issue_rotation_credential_with(subject_did, options, provider, clock)
            .await?)
    }

    /// Issues the pair of mutually asserting credentials: `first` vouching for `second` and
    /// `second` vouching for `first`, in that order.
    async fn issue_vcs(
        first: &RotationAttestor,
        second: &RotationAttestor,
        options: &ProofOptions,
        provider: &dyn SigningProvider,
        clock: &dyn Clock,
    ) -> Result<[Value; ROTATION_PAIR_LEN], DIDRotationAPIError> {
        let forward =
            Self::issue_rotation_credential(first, second.did(), options, provider, clock).await?;
        let backward =
            Self::issue_rotation_credential(second, first.did(), options, provider, clock).await?;
        Ok([forward, backward])
    }
}

/// API for DID rotation presentation functionality.
#[async_trait]
pub trait DIDRotationVPAPI {
    /// Bundles two credentials into a presentation signed by `holder`.
    async fn issue_presentation(
        holder: &RotationAttestor,
        credential_a: &Value,
        credential_b: &Value,
        options: &ProofOptions,
        provider: &dyn SigningProvider,
    ) -> Result<Value, DIDRotationAPIError> {
        Ok(holder
            .issue_presentation_with(credential_a, credential_b, options, provider)
            .await?)
    }

    /// Verifies a rotation presentation.
    async fn verify_presentation(
        presentation: &Value,
        provider: &dyn SigningProvider,
    ) -> Result<(), PresentationError> {
        let outcome = RotationVerifier::new(provider).verify(presentation).await;
        if outcome.is_ok() {
            info!("Rotation presentation verified.");
        }
        outcome
    }

    /// Verifies many presentations with at most `limit` verifications in flight, returning the
    /// outcomes in input order.
    async fn verify_presentations(
        presentations: &[Value],
        limit: usize,
        provider: &dyn SigningProvider,
    ) -> Vec<Result<(), PresentationError>> {
        let verifications: Vec<_> = presentations
            .iter()
            .map(|presentation| Self::verify_presentation(presentation, provider))
            .collect();
        stream::iter(verifications)
            .buffered(limit.max(1))
            .collect()
            .await
    }
}

/// API for reading and writing documents and key material.
pub trait DIDRotationDocumentAPI {
    /// Reads a JSON document from a file.
    fn read_document(path: &Path) -> Result<Value, DIDRotationAPIError> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            DIDRotationAPIError::FileReadError(format!("{}: {}", path.display(), err))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes a JSON document to a file, pretty printed.
    fn write_document(path: &Path, document: &Value) -> Result<(), DIDRotationAPIError> {
        let contents = serde_json::to_string_pretty(document)
            .map_err(DIDRotationAPIError::FailedToSerialize)?;
        std::fs::write(path, contents).map_err(|err| {
            DIDRotationAPIError::FileWriteError(format!("{}: {}", path.display(), err))
        })
    }

    /// Loads an attestor for `did` with its signing key read from `key_path`.
    fn load_attestor(did: &str, key_path: &Path) -> Result<RotationAttestor, DIDRotationAPIError> {
        Ok(RotationAttestor::from_key_file(did, key_path)?)
    }
}
