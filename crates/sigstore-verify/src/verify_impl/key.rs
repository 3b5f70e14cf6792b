//! Key material resolution and validation

use super::chain::verify_certificate_chain;
use super::sct::verify_scts;
use crate::error::{Error, Result};
use crate::verify::Signer;
use chrono::{DateTime, Utc};
use sigstore_crypto::{Certificate, VerificationKey};
use sigstore_trust_root::TrustMaterial;

/// Resolve a public key hint and check the key was valid at every timestamp
pub fn verify_public_key(
    hint: &str,
    timestamps: &[DateTime<Utc>],
    material: &TrustMaterial,
) -> Result<VerificationKey> {
    let key = material
        .resolve_key(hint)
        .ok_or_else(|| Error::PublicKey(format!("no trusted key found for hint {:?}", hint)))?;

    if let Some(time) = timestamps.iter().find(|t| !key.valid_for(**t)) {
        return Err(Error::PublicKey(format!(
            "key {:?} is not valid at {}",
            hint, time
        )));
    }

    Ok(key.key)
}

/// Outcome of trusting a signing certificate
#[derive(Debug, Clone)]
pub struct CertificateTrust {
    /// Chain built at the last timestamp, leaf first
    pub chain: Vec<Certificate>,
    /// IDs of the CT logs whose SCTs verified
    pub scts: Vec<Vec<u8>>,
    pub signer: Signer,
}

/// Chain the leaf to a trusted CA at every timestamp, then verify its SCTs
/// and extract the signer identity.
pub fn verify_certificate(
    leaf: &Certificate,
    timestamps: &[DateTime<Utc>],
    material: &TrustMaterial,
) -> Result<CertificateTrust> {
    let mut chain = None;
    for time in timestamps {
        chain = Some(verify_certificate_chain(
            *time,
            leaf,
            &material.certificate_authorities,
        )?);
    }
    let chain = chain.ok_or_else(|| {
        Error::certificate("no verified timestamp to check the certificate against")
    })?;

    // A self-signed leaf is its own issuer
    let issuer = chain.get(1).unwrap_or(leaf);
    let scts = verify_scts(leaf, issuer, &material.ctlogs)?;

    let key = leaf
        .public_key()
        .map_err(|e| Error::certificate(format!("unusable signing key: {}", e)))?;
    let signer = Signer {
        key,
        identity: leaf.subject_alternative_name(),
        issuer: leaf.oidc_issuer(),
    };

    Ok(CertificateTrust {
        chain,
        scts,
        signer,
    })
}
