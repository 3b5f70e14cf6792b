//! RFC 3161 timestamp tokens for Sigstore verification
//!
//! This crate parses Time-Stamp Protocol tokens (RFC 3161) found in
//! bundles and verifies that a token commits to the timestamped data and
//! was signed by a given timestamp authority certificate.

pub mod asn1;
pub mod error;
pub mod token;

pub use asn1::{MessageImprint, PkiStatusInfo, TimeStampResp, TstInfo};
pub use error::{Error, Result};
pub use token::ParsedTimestamp;
