//! DID rotation presentation data model and verification errors.
use crate::one_or_many::OneOrMany;
use crate::provider::VerificationResult;
use crate::vc::CredentialError;
use crate::{CREDENTIALS_V1_CONTEXT, ROTATION_PAIR_LEN, VERIFIABLE_PRESENTATION_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The stage-level category of a presentation rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// The presentation does not have the required shape.
    IncompletePresentation,
    /// An embedded credential failed its signature, type or self-consistency check.
    InvalidCredential,
    /// The credentials do not bind the holder or do not form a mutual rotation.
    InvalidPresentation,
    /// The presentation proof by the holder failed verification.
    EnvelopeInvalid,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::IncompletePresentation => f.write_str("incomplete presentation"),
            RejectionKind::InvalidCredential => f.write_str("credential invalid"),
            RejectionKind::InvalidPresentation => f.write_str("presentation invalid"),
            RejectionKind::EnvelopeInvalid => f.write_str("presentation proof invalid"),
        }
    }
}

/// An error relating to the verification of a rotation presentation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresentationError {
    /// Presentation document could not be read.
    #[error("Malformed presentation: {0}")]
    MalformedPresentation(String),
    /// No holder present in presentation.
    #[error("No holder.")]
    NoHolderPresent,
    /// No credentials present in presentation.
    #[error("No credentials.")]
    NoCredentialsPresent,
    /// Presentation does not contain exactly two credentials.
    #[error("Incomplete presentation: expected 2 credentials, found {0}.")]
    IncompletePresentation(usize),
    /// Embedded credential at the given index was rejected.
    #[error("Credential {0} invalid: {1}")]
    InvalidCredential(usize, CredentialError),
    /// Holder is neither issuer nor subject of the credential at the given index.
    #[error("Presentation invalid: holder {holder} is not named in credential {index}.")]
    HolderNotParty { holder: String, index: usize },
    /// The two credentials do not assert the same relationship in opposite directions.
    #[error(
        "Presentation invalid: credential 0 ({first_issuer} -> {first_subject}) is not reversed by credential 1 ({second_issuer} -> {second_subject})."
    )]
    UnpairedRotation {
        first_issuer: String,
        first_subject: String,
        second_issuer: String,
        second_subject: String,
    },
    /// Credentials verified, but holder failed to authenticate with invalid or missing
    /// presentation proof.
    #[error("Credentials verified for an unauthenticated holder: {0:?}")]
    VerifiedHolderUnauthenticated(VerificationResult),
}

impl PresentationError {
    /// Stage-level category of the rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            PresentationError::MalformedPresentation(_)
            | PresentationError::NoHolderPresent
            | PresentationError::NoCredentialsPresent
            | PresentationError::IncompletePresentation(_) => {
                RejectionKind::IncompletePresentation
            }
            PresentationError::InvalidCredential(..) => RejectionKind::InvalidCredential,
            PresentationError::HolderNotParty { .. } | PresentationError::UnpairedRotation { .. } => {
                RejectionKind::InvalidPresentation
            }
            PresentationError::VerifiedHolderUnauthenticated(_) => RejectionKind::EnvelopeInvalid,
        }
    }

    /// Provider result wrapped by this rejection, if any.
    pub fn provider_result(&self) -> Option<&VerificationResult> {
        match self {
            PresentationError::InvalidCredential(
                _,
                CredentialError::VerificationResultError(result),
            )
            | PresentationError::VerifiedHolderUnauthenticated(result) => Some(result),
            _ => None,
        }
    }

    /// Reports the rejection as a verification result: the rejection reason followed by the
    /// provider's errors, and the provider's warnings.
    pub fn to_verification_result(&self) -> VerificationResult {
        let mut errors = vec![format!("{}: {}", self.kind(), self)];
        let mut warnings = Vec::new();
        if let Some(result) = self.provider_result() {
            errors.extend(result.errors.iter().cloned());
            warnings.extend(result.warnings.iter().cloned());
        }
        VerificationResult { errors, warnings }
    }
}

/// Converts the outcome of a verification into a verification result.
pub fn verification_result(outcome: &Result<(), PresentationError>) -> VerificationResult {
    match outcome {
        Ok(()) => VerificationResult::new(),
        Err(err) => err.to_verification_result(),
    }
}

/// A presentation of exactly two rotation credentials by a holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPresentation {
    #[serde(rename = "@context")]
    pub context: OneOrMany<Value>,
    #[serde(rename = "type")]
    pub type_: OneOrMany<String>,
    pub holder: String,
    pub verifiable_credential: [Value; ROTATION_PAIR_LEN],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
}

/// Presentation as found in a document, before its shape is checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedPresentation {
    #[serde(rename = "@context", default)]
    context: OneOrMany<Value>,
    #[serde(rename = "type", default)]
    type_: OneOrMany<String>,
    holder: Option<String>,
    verifiable_credential: Option<OneOrMany<Value>>,
    proof: Option<Value>,
}

impl TryFrom<UncheckedPresentation> for RotationPresentation {
    type Error = PresentationError;

    fn try_from(presentation: UncheckedPresentation) -> Result<Self, Self::Error> {
        let holder = presentation
            .holder
            .ok_or(PresentationError::NoHolderPresent)?;
        let credentials = presentation
            .verifiable_credential
            .ok_or(PresentationError::NoCredentialsPresent)?
            .into_vec();
        let verifiable_credential: [Value; ROTATION_PAIR_LEN] = credentials
            .try_into()
            .map_err(|found: Vec<Value>| PresentationError::IncompletePresentation(found.len()))?;
        Ok(Self {
            context: presentation.context,
            type_: presentation.type_,
            holder,
            verifiable_credential,
            proof: presentation.proof,
        })
    }
}

impl RotationPresentation {
    /// Constructs an unsigned presentation embedding the credentials verbatim and in order.
    pub fn new(holder: &str, credential_a: Value, credential_b: Value) -> Self {
        Self {
            context: OneOrMany::One(Value::String(CREDENTIALS_V1_CONTEXT.to_string())),
            type_: OneOrMany::One(VERIFIABLE_PRESENTATION_TYPE.to_string()),
            holder: holder.to_string(),
            verifiable_credential: [credential_a, credential_b],
            proof: None,
        }
    }

    /// Reads a presentation from a JSON document, checking it holds a holder and exactly two
    /// credentials.
    pub fn from_document(document: &Value) -> Result<Self, PresentationError> {
        UncheckedPresentation::deserialize(document)
            .map_err(|err| PresentationError::MalformedPresentation(err.to_string()))?
            .try_into()
    }

    /// Serializes the presentation to a JSON document.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn credentials(&self) -> &[Value; ROTATION_PAIR_LEN] {
        &self.verifiable_credential
    }
}
