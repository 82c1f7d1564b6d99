//! API for DID rotation credential, presentation and document functionality.
pub mod api;
pub mod errors;
use crate::api::{DIDRotationDocumentAPI, DIDRotationVCAPI, DIDRotationVPAPI};

/// A type for implementing CLI traits on.
pub struct DIDRotationAPI;

impl DIDRotationVCAPI for DIDRotationAPI {}
impl DIDRotationVPAPI for DIDRotationAPI {}
impl DIDRotationDocumentAPI for DIDRotationAPI {}
