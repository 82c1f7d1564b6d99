//! DID rotation library: cross-signed rotation credentials and their verification.
pub use didrotate_api as api;
pub use didrotate_core as rotation;
pub use didrotate_ssi as ssi_provider;
