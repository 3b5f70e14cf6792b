//! DSSE envelopes
//!
//! Signers sign the pre-authentication encoding of the payload, never the
//! payload itself. See <https://github.com/secure-systems-lab/dsse>.

use crate::encoding::{PayloadBytes, SignatureBytes};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEnvelope {
    pub payload_type: String,
    pub payload: PayloadBytes,
    #[serde(default)]
    pub signatures: Vec<DsseSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsseSignature {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keyid: String,
    pub sig: SignatureBytes,
}

impl DsseEnvelope {
    /// Bytes covered by the envelope's signatures
    pub fn pae(&self) -> Vec<u8> {
        pae(&self.payload_type, self.payload.as_bytes())
    }

    /// The signature a Sigstore bundle is verified with.
    ///
    /// Bundles carry exactly one signer; any further signatures are ignored.
    pub fn primary_signature(&self) -> Option<&SignatureBytes> {
        self.signatures.first().map(|s| &s.sig)
    }
}

/// `DSSEv1 SP len(type) SP type SP len(body) SP body`, lengths in ASCII decimal
pub fn pae(payload_type: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload_type.len() + payload.len() + 32);
    // Writing into a Vec cannot fail
    let _ = write!(out, "DSSEv1 {} {} {} ", payload_type.len(), payload_type, payload.len());
    out.extend_from_slice(payload);
    out
}
