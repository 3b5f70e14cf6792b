//! Core data types for Sigstore verification
//!
//! This crate provides the bundle data model consumed by the verifier,
//! the DSSE envelope with its pre-authentication encoding, and the byte
//! encoding newtypes shared by every other crate in the workspace.

pub mod bundle;
pub mod dsse;
pub mod encoding;
pub mod error;
pub mod hash;

pub use bundle::{
    Bundle, CertificateContent, CheckpointData, InclusionPromise, InclusionProof, KindVersion,
    LogId, MediaType, MessageDigest, MessageSignature, Rfc3161Timestamp, SignatureContent,
    TimestampVerificationData, TransparencyLogEntry, VerificationMaterial,
    VerificationMaterialContent,
};
pub use dsse::{pae, DsseEnvelope, DsseSignature};
pub use encoding::{
    CanonicalizedBody, DerCertificate, DerPublicKey, DigestBytes, Hex, LogIndex, LogKeyId,
    PayloadBytes, Sha256Hash, SignatureBytes, SignedTimestamp, TimestampToken,
};
pub use error::{Error, Result};
pub use hash::HashAlgorithm;
