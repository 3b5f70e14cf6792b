//! Sigstore trusted root parsing and trust material
//!
//! The trusted root document lists every trust anchor a verifier uses:
//! - certificate authorities (Fulcio) issuing signing certificates
//! - transparency logs (Rekor) whose promises and checkpoints anchor entries
//! - certificate transparency logs issuing SCTs
//! - RFC 3161 timestamp authorities
//!
//! [`TrustMaterial::build`] turns the document into parsed certificates and
//! keys, each with its validity window, and the [`filter`] functions select
//! the anchors valid at a given time.
//!
//! # Example
//!
//! ```no_run
//! use sigstore_trust_root::{TrustMaterial, TrustedRoot};
//!
//! let root = TrustedRoot::from_file("trusted_root.json").unwrap();
//! let material = TrustMaterial::from_root(&root).unwrap();
//! ```

pub mod error;
pub mod filter;
pub mod key;
pub mod material;
pub mod trusted_root;
pub mod window;

pub use error::{Error, Result};
pub use filter::{filter_cert_authorities, filter_tlog_authorities, TLogFilter};
pub use key::{KeyMap, KeyResolver, TrustedPublicKey};
pub use material::{CertAuthority, TLogAuthority, TrustMaterial};
pub use trusted_root::{
    CertificateAuthority, PublicKey, TimeRange, TransparencyLogInstance, TrustedRoot,
    X509CertificateChain,
};
pub use window::ValidityWindow;
