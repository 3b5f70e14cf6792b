//! Cryptographic primitives for Sigstore verification
//!
//! This crate provides hashing, signature verification over SPKI keys,
//! an immutable X.509 certificate wrapper and signed-note parsing, using
//! aws-lc-rs as the cryptographic backend.

pub mod checkpoint;
pub mod error;
pub mod hash;
pub mod scheme;
pub mod verification;
pub mod x509;

pub use checkpoint::{LogCheckpoint, NoteSignature, SignedNote};
pub use error::{Error, Result};
pub use hash::{hash, sha256};
pub use scheme::SigningScheme;
pub use verification::{verify_signature, VerificationKey};
pub use x509::{Certificate, OIDC_ISSUER_V1_OID, OIDC_ISSUER_V2_OID};
