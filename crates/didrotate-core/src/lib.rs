//! Core traits and logic for DID rotation credentials (signing backend independent).
pub mod attestor;
pub mod data;
pub mod holder;
pub mod issuer;
pub mod key_manager;
pub mod one_or_many;
pub mod provider;
pub mod scripted;
pub mod subject;
pub mod utils;
pub mod vc;
pub mod verifier;
pub mod vp;

/// Environment variable name for the DID rotation config file.
pub const DIDROTATE_CONFIG: &str = "DIDROTATE_CONFIG";

/// Base context of W3C verifiable credentials and presentations.
pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Base type carried by every verifiable credential.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Type identifying a DID rotation credential.
pub const ROTATION_CREDENTIAL_TYPE: &str = "DIDRotationCredential";

/// Type of the presentation envelope.
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// Credential subject property naming the DID that shares the subject's controller.
pub const SAME_CONTROLLER_AS: &str = "sameControllerAs";

/// Namespace for the JSON-LD terms introduced by rotation credentials.
pub const ROTATION_VOCABULARY: &str = "https://w3id.org/did-rotation/v1#";

/// Number of credentials in a rotation presentation.
pub const ROTATION_PAIR_LEN: usize = 2;
