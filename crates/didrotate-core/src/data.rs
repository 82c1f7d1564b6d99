#![allow(dead_code)]
pub const TEST_DID_A: &str = "did:example:A";
pub const TEST_DID_B: &str = "did:example:B";
pub const TEST_DID_C: &str = "did:example:C";

pub const TEST_KEY_A: &str = "K_A";
pub const TEST_KEY_B: &str = "K_B";
pub const TEST_KEY_C: &str = "K_C";

pub const TEST_ISSUANCE_DATE: &str = "2023-05-01T12:00:00Z";

/// Unix time of `TEST_ISSUANCE_DATE`.
pub const TEST_ISSUANCE_TIMESTAMP: i64 = 1682942400;

pub const TEST_UNSIGNED_ROTATION_VC: &str = r##"
{
   "@context" : [
      "https://www.w3.org/2018/credentials/v1",
      {
         "DIDRotationCredential" : "https://w3id.org/did-rotation/v1#DIDRotationCredential",
         "sameControllerAs" : {
            "@id" : "https://w3id.org/did-rotation/v1#sameControllerAs",
            "@type" : "@id"
         }
      }
   ],
   "type" : [
      "VerifiableCredential",
      "DIDRotationCredential"
   ],
   "issuer" : "did:example:A",
   "issuanceDate" : "2023-05-01T12:00:00Z",
   "credentialSubject" : {
      "id" : "did:example:B",
      "sameControllerAs" : "did:example:A"
   }
}
"##;

pub const TEST_UNSIGNED_ROTATION_VP: &str = r##"
{
   "@context" : "https://www.w3.org/2018/credentials/v1",
   "type" : "VerifiablePresentation",
   "holder" : "did:example:A",
   "verifiableCredential" : [
      {
         "type" : ["VerifiableCredential", "DIDRotationCredential"],
         "issuer" : "did:example:A",
         "issuanceDate" : "2023-05-01T12:00:00Z",
         "credentialSubject" : {
            "id" : "did:example:B",
            "sameControllerAs" : "did:example:A"
         }
      }
   ]
}
"##;
