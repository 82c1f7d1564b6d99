//! DID rotation credential data model.
use crate::one_or_many::OneOrMany;
use crate::provider::VerificationResult;
use crate::{
    CREDENTIALS_V1_CONTEXT, ROTATION_CREDENTIAL_TYPE, ROTATION_VOCABULARY, SAME_CONTROLLER_AS,
    VERIFIABLE_CREDENTIAL_TYPE,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// An error relating to an embedded rotation credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Credential document could not be read as a rotation credential.
    #[error("Malformed credential: {0}")]
    Malformed(String),
    /// Wrapped verification result with errors or warnings.
    #[error("A wrapped verification result error: {0:?}")]
    VerificationResultError(VerificationResult),
    /// Credential is not of the rotation credential type.
    #[error("Not a DIDRotationCredential, found types: {0:?}.")]
    NotRotationCredential(Vec<String>),
    /// No `sameControllerAs` property in the credential subject.
    #[error("No sameControllerAs in credential subject.")]
    NoSameControllerAs,
    /// The credential does not name its own issuer as sharing the subject's controller.
    #[error("Issuer {issuer} does not match sameControllerAs {same_controller_as}.")]
    MismatchedSameControllerAs {
        issuer: String,
        same_controller_as: String,
    },
}

/// Issuer of a credential, either a bare DID or an object with an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssuerRef {
    URI(String),
    Object { id: String },
}

impl IssuerRef {
    pub fn id(&self) -> &str {
        match self {
            IssuerRef::URI(id) => id,
            IssuerRef::Object { id } => id,
        }
    }
}

/// Subject of a rotation credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationSubject {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_controller_as: Option<String>,
}

/// A credential in which `issuer` asserts that the controller of `credentialSubject.id` is the
/// same as its own controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationCredential {
    #[serde(rename = "@context", default)]
    pub context: OneOrMany<Value>,
    #[serde(rename = "type")]
    pub type_: OneOrMany<String>,
    pub issuer: IssuerRef,
    pub issuance_date: String,
    pub credential_subject: RotationSubject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
}

/// Inline JSON-LD context defining the rotation credential terms.
pub fn rotation_context() -> Value {
    json!({
        (ROTATION_CREDENTIAL_TYPE): format!("{}{}", ROTATION_VOCABULARY, ROTATION_CREDENTIAL_TYPE),
        (SAME_CONTROLLER_AS): {
            "@id": format!("{}{}", ROTATION_VOCABULARY, SAME_CONTROLLER_AS),
            "@type": "@id"
        }
    })
}

impl RotationCredential {
    /// Constructs an unsigned rotation credential in which `issuer` vouches that `subject`
    /// shares its controller.
    pub fn new(issuer: &str, subject: &str, issuance_date: String) -> Self {
        Self {
            context: OneOrMany::Many(vec![
                Value::String(CREDENTIALS_V1_CONTEXT.to_string()),
                rotation_context(),
            ]),
            type_: OneOrMany::Many(vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
                ROTATION_CREDENTIAL_TYPE.to_string(),
            ]),
            issuer: IssuerRef::URI(issuer.to_string()),
            issuance_date,
            credential_subject: RotationSubject {
                id: subject.to_string(),
                same_controller_as: Some(issuer.to_string()),
            },
            proof: None,
        }
    }

    /// Reads a rotation credential from a (signed) JSON document.
    pub fn from_document(document: &Value) -> Result<Self, CredentialError> {
        RotationCredential::deserialize(document)
            .map_err(|err| CredentialError::Malformed(err.to_string()))
    }

    /// Serializes the credential to a JSON document.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn issuer(&self) -> &str {
        self.issuer.id()
    }

    pub fn subject_id(&self) -> &str {
        &self.credential_subject.id
    }

    /// Checks the `DIDRotationCredential` type is present.
    pub fn check_type(&self) -> Result<(), CredentialError> {
        if self.type_.contains_str(ROTATION_CREDENTIAL_TYPE) {
            Ok(())
        } else {
            Err(CredentialError::NotRotationCredential(
                self.type_.clone().into_vec(),
            ))
        }
    }

    /// Checks `credentialSubject.sameControllerAs` equals the issuer.
    pub fn check_same_controller(&self) -> Result<(), CredentialError> {
        let same_controller_as = self
            .credential_subject
            .same_controller_as
            .as_deref()
            .ok_or(CredentialError::NoSameControllerAs)?;
        if same_controller_as == self.issuer() {
            Ok(())
        } else {
            Err(CredentialError::MismatchedSameControllerAs {
                issuer: self.issuer().to_string(),
                same_controller_as: same_controller_as.to_string(),
            })
        }
    }

    /// True if `did` is either the issuer or the subject of this credential.
    pub fn names(&self, did: &str) -> bool {
        self.issuer() == did || self.subject_id() == did
    }

    /// True if `other` asserts the same relationship in the opposite direction between two
    /// distinct DIDs. A self-issued credential is never part of a pair.
    pub fn is_reverse_of(&self, other: &RotationCredential) -> bool {
        self.issuer() != self.subject_id()
            && other.issuer() == self.subject_id()
            && other.subject_id() == self.issuer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TEST_DID_A, TEST_DID_B, TEST_ISSUANCE_DATE, TEST_UNSIGNED_ROTATION_VC};

    #[test]
    fn test_new_credential_document() {
        let credential =
            RotationCredential::new(TEST_DID_A, TEST_DID_B, TEST_ISSUANCE_DATE.to_string());
        let document = credential.to_document().unwrap();
        let expected: Value = serde_json::from_str(TEST_UNSIGNED_ROTATION_VC).unwrap();
        assert_eq!(document, expected);
        assert!(document.get("proof").is_none());
    }

    #[test]
    fn test_from_document() {
        let document: Value = serde_json::from_str(TEST_UNSIGNED_ROTATION_VC).unwrap();
        let credential = RotationCredential::from_document(&document).unwrap();
        assert_eq!(credential.issuer(), TEST_DID_A);
        assert_eq!(credential.subject_id(), TEST_DID_B);
        assert!(credential.check_type().is_ok());
        assert!(credential.check_same_controller().is_ok());
        assert!(credential.names(TEST_DID_A));
        assert!(credential.names(TEST_DID_B));
        assert!(!credential.names("did:example:C"));
    }

    #[test]
    fn test_from_document_issuer_object() {
        let document = json!({
            "type": "DIDRotationCredential",
            "issuer": {"id": TEST_DID_A, "name": "A"},
            "issuanceDate": TEST_ISSUANCE_DATE,
            "credentialSubject": {"id": TEST_DID_B, "sameControllerAs": TEST_DID_A}
        });
        let credential = RotationCredential::from_document(&document).unwrap();
        assert_eq!(credential.issuer(), TEST_DID_A);
        assert!(credential.check_type().is_ok());
    }

    #[test]
    fn test_from_document_malformed() {
        let document = json!({"type": ["VerifiableCredential"], "issuer": TEST_DID_A});
        assert!(matches!(
            RotationCredential::from_document(&document),
            Err(CredentialError::Malformed(_))
        ));
    }

    #[test]
    fn test_check_type() {
        let mut credential =
            RotationCredential::new(TEST_DID_A, TEST_DID_B, TEST_ISSUANCE_DATE.to_string());
        credential.type_ = OneOrMany::One(VERIFIABLE_CREDENTIAL_TYPE.to_string());
        assert_eq!(
            credential.check_type(),
            Err(CredentialError::NotRotationCredential(vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string()
            ]))
        );
    }

    #[test]
    fn test_check_same_controller() {
        let mut credential =
            RotationCredential::new(TEST_DID_A, TEST_DID_B, TEST_ISSUANCE_DATE.to_string());
        credential.credential_subject.same_controller_as = Some(TEST_DID_B.to_string());
        assert_eq!(
            credential.check_same_controller(),
            Err(CredentialError::MismatchedSameControllerAs {
                issuer: TEST_DID_A.to_string(),
                same_controller_as: TEST_DID_B.to_string()
            })
        );
        credential.credential_subject.same_controller_as = None;
        assert_eq!(
            credential.check_same_controller(),
            Err(CredentialError::NoSameControllerAs)
        );
    }

    #[test]
    fn test_is_reverse_of() {
        let ab = RotationCredential::new(TEST_DID_A, TEST_DID_B, TEST_ISSUANCE_DATE.to_string());
        let ba = RotationCredential::new(TEST_DID_B, TEST_DID_A, TEST_ISSUANCE_DATE.to_string());
        let ac = RotationCredential::new(TEST_DID_A, "did:example:C", TEST_ISSUANCE_DATE.to_string());
        assert!(ab.is_reverse_of(&ba));
        assert!(ba.is_reverse_of(&ab));
        assert!(!ab.is_reverse_of(&ab));
        assert!(!ac.is_reverse_of(&ba));
    }

    #[test]
    fn test_self_issued_is_not_reverse() {
        let aa = RotationCredential::new(TEST_DID_A, TEST_DID_A, TEST_ISSUANCE_DATE.to_string());
        assert!(aa.check_same_controller().is_ok());
        assert!(!aa.is_reverse_of(&aa));
    }
}
