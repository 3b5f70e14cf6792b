//! Trust verification for Sigstore bundles
//!
//! Given a bundle and trust material built from a trusted root, this crate
//! decides whether the bundle's signature can be trusted: the signing key is
//! either a known public key or a certificate chaining to a trusted CA, and
//! every timestamp attestation (transparency log entries, RFC 3161 tokens,
//! embedded SCTs) verifies against the configured logs and authorities.
//!
//! # Example
//!
//! ```no_run
//! use sigstore_verify::{Verifier, VerifierOptions};
//! use sigstore_verify::trust_root::{KeyMap, TrustedRoot};
//! use sigstore_verify::types::Bundle;
//!
//! # fn example(root_json: &str, bundle_json: &str, artifact: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let root = TrustedRoot::from_json(root_json)?;
//! let verifier = Verifier::from_trusted_root(&root, KeyMap::new(), VerifierOptions::recommended())?;
//!
//! let bundle = Bundle::from_json(bundle_json)?;
//! let entity = verifier.verify(&bundle, Some(artifact))?;
//! if let Some(signer) = &entity.signer {
//!     println!("signed by {:?}", signer.identity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
mod verify;
pub mod verify_impl;

pub use error::{Error, ErrorCode, Result};
pub use verify::{
    verify, Key, SignedEntity, Signer, TimestampKind, VerifiedTimestamp, Verifier,
    VerifierOptions,
};
pub use verify_impl::chain::verify_certificate_chain;
pub use verify_impl::content::SignatureContent;
pub use verify_impl::key::{verify_certificate, verify_public_key, CertificateTrust};
pub use verify_impl::sct::verify_scts;
pub use verify_impl::timestamp::verify_rfc3161_timestamp;
pub use verify_impl::tlog::{verify_checkpoint, verify_inclusion, verify_tlog_entry, verify_tlog_set};

pub use sigstore_crypto as crypto;
pub use sigstore_trust_root as trust_root;
pub use sigstore_tsa as tsa;
pub use sigstore_types as types;
